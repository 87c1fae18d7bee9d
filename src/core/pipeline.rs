use crate::core::query::{build_query, search_terms};
use crate::core::transform::transform;
use crate::domain::model::{CommitReceipt, LearnerProfile, RoadmapRecord, RoadmapStep};
use crate::domain::ports::{ConfigProvider, RecordStore, SearchGateway, SearchRequest};
use crate::utils::error::{FailureKind, Result, RoadmapError};
use std::time::Duration;

/// Upper bound on results requested from the search provider.
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Validating,
    Searching,
    Transforming,
    Persisting,
    Succeeded,
    Failed(FailureKind),
}

/// States visited by a single generation request.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    history: Vec<PipelineState>,
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineState::Idle)
    }

    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!("Pipeline state {:?} -> {:?}", self.state(), next);
        self.history.push(next);
    }

    fn fail(&mut self, error: RoadmapError) -> RoadmapError {
        if let Some(kind) = error.kind() {
            self.advance(PipelineState::Failed(kind));
        }
        error
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully computed roadmap that has not been committed yet.
///
/// The steps can only be taken out with the receipt of a successful commit.
#[derive(Debug)]
pub struct PendingRoadmap {
    record: RoadmapRecord,
}

impl PendingRoadmap {
    pub fn new(record: RoadmapRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &RoadmapRecord {
        &self.record
    }

    pub fn release(self, receipt: &CommitReceipt) -> Result<Vec<RoadmapStep>> {
        if receipt.record_id != self.record.id {
            return Err(RoadmapError::persistence(format!(
                "commit receipt is for record {} but pending record is {}",
                receipt.record_id, self.record.id
            )));
        }
        Ok(self.record.steps)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub max_results: usize,
    pub search_timeout: Duration,
    pub persist_timeout: Duration,
}

impl PipelineSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            max_results: config.max_results().clamp(1, MAX_SEARCH_RESULTS),
            search_timeout: config.search_timeout(),
            persist_timeout: config.persist_timeout(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_results: MAX_SEARCH_RESULTS,
            search_timeout: Duration::from_secs(10),
            persist_timeout: Duration::from_secs(10),
        }
    }
}

/// Profile -> query -> search -> transform -> persist -> release.
pub struct RoadmapPipeline<G: SearchGateway, R: RecordStore> {
    gateway: G,
    store: R,
    settings: PipelineSettings,
}

impl<G: SearchGateway, R: RecordStore> RoadmapPipeline<G, R> {
    pub fn new(gateway: G, store: R) -> Self {
        Self::with_settings(gateway, store, PipelineSettings::default())
    }

    pub fn with_settings(gateway: G, store: R, settings: PipelineSettings) -> Self {
        Self {
            gateway,
            store,
            settings,
        }
    }

    pub async fn generate(&self, profile: LearnerProfile) -> Result<Vec<RoadmapStep>> {
        let mut run = PipelineRun::new();
        self.execute(profile, &mut run).await
    }

    /// Runs one request, recording every state transition in `run`.
    pub async fn execute(
        &self,
        profile: LearnerProfile,
        run: &mut PipelineRun,
    ) -> Result<Vec<RoadmapStep>> {
        run.advance(PipelineState::Validating);
        let query = build_query(&profile);
        if query.is_empty() {
            tracing::warn!("Rejecting roadmap request with an empty profile");
            return Err(run.fail(RoadmapError::InvalidInput {
                message: "at least one of job profile, qualification, skills or interests is required"
                    .to_string(),
            }));
        }

        run.advance(PipelineState::Searching);
        let request = SearchRequest {
            query: search_terms(&query),
            num: self.settings.max_results,
        };
        tracing::info!("🔍 Searching for: {}", request.query);

        let mut results = match tokio::time::timeout(
            self.settings.search_timeout,
            self.gateway.search(&request),
        )
        .await
        {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                tracing::error!("❌ Search failed: {}", e);
                return Err(run.fail(as_upstream_error(e)));
            }
            Err(_) => {
                tracing::error!(
                    "❌ Search timed out after {:?}",
                    self.settings.search_timeout
                );
                return Err(run.fail(RoadmapError::upstream(
                    None,
                    format!("search timed out after {:?}", self.settings.search_timeout),
                )));
            }
        };

        if results.is_empty() {
            tracing::warn!("No resources found for: {}", query);
            return Err(run.fail(RoadmapError::NoResults { query }));
        }
        if results.len() > self.settings.max_results {
            tracing::warn!(
                "Search returned {} results, keeping the first {}",
                results.len(),
                self.settings.max_results
            );
            results.truncate(self.settings.max_results);
        }
        tracing::info!("Received {} search results", results.len());

        run.advance(PipelineState::Transforming);
        let steps = transform(&results, &profile.time_commitment);
        let pending = PendingRoadmap::new(RoadmapRecord::new(profile, steps));

        run.advance(PipelineState::Persisting);
        let receipt = match tokio::time::timeout(
            self.settings.persist_timeout,
            self.store.append(pending.record()),
        )
        .await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                tracing::error!("❌ Failed to persist roadmap {}: {}", pending.record().id, e);
                return Err(run.fail(as_persistence_error(e)));
            }
            Err(_) => {
                tracing::error!(
                    "❌ Persisting roadmap timed out after {:?}",
                    self.settings.persist_timeout
                );
                if let Err(e) = self.store.abort(&pending.record().id).await {
                    tracing::error!(
                        "❌ Failed to clean up abandoned roadmap {}: {}",
                        pending.record().id,
                        e
                    );
                }
                return Err(run.fail(RoadmapError::persistence(format!(
                    "write timed out after {:?}",
                    self.settings.persist_timeout
                ))));
            }
        };

        let steps = pending.release(&receipt).map_err(|e| run.fail(e))?;
        run.advance(PipelineState::Succeeded);
        tracing::info!(
            "✅ Roadmap {} with {} steps saved to {}",
            receipt.record_id,
            steps.len(),
            receipt.location
        );
        Ok(steps)
    }
}

// Anything the gateway reports counts as an upstream failure.
fn as_upstream_error(error: RoadmapError) -> RoadmapError {
    match error {
        RoadmapError::Upstream { .. } => error,
        other => RoadmapError::upstream(None, other.to_string()),
    }
}

// Anything a store reports while writing counts as a persistence failure.
fn as_persistence_error(error: RoadmapError) -> RoadmapError {
    match error {
        RoadmapError::Persistence { .. } => error,
        other => RoadmapError::persistence(other.to_string()),
    }
}
