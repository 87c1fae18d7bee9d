use crate::domain::model::{CommitReceipt, RoadmapRecord, SearchResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Must fail if `path` already exists.
    fn write_new_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
    /// Makes sure an abandoned `write_new_file` for `path` leaves nothing behind,
    /// whether it is still running or already finished.
    fn abort_write(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn search_endpoint(&self) -> &str;
    fn search_api_key(&self) -> &str;
    fn search_engine_id(&self) -> &str;
    fn max_results(&self) -> usize;
    fn search_timeout(&self) -> Duration;
    fn persist_timeout(&self) -> Duration;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub num: usize,
}

/// Web search provider. Results come back in provider ranking order.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>>;
}

/// Append-only record store. A write either lands completely or not at all.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, record: &RoadmapRecord) -> Result<CommitReceipt>;

    /// Called when an `append` for `id` was abandoned before it reported back.
    /// Afterwards the record must not be visible.
    async fn abort(&self, _id: &Uuid) -> Result<()> {
        Ok(())
    }
}
