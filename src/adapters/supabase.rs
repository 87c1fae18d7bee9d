use crate::domain::model::{CommitReceipt, RoadmapRecord};
use crate::domain::ports::RecordStore;
use crate::utils::error::{Result, RoadmapError};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_TABLE: &str = "user_roadmaps";

/// Inserts records as rows through the Supabase (PostgREST) REST interface.
pub struct SupabaseRecordStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseRecordStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: table.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    async fn append(&self, record: &RoadmapRecord) -> Result<CommitReceipt> {
        let url = self.table_url();
        tracing::debug!("Inserting record {} into {}", record.id, url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| RoadmapError::persistence(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoadmapError::persistence(format!(
                "{} rejected insert with HTTP {}: {}",
                self.table,
                status.as_u16(),
                body
            )));
        }

        Ok(CommitReceipt {
            record_id: record.id,
            location: format!("{}?id=eq.{}", url, record.id),
        })
    }
}
