use crate::core::guard::InFlightRegistry;
use crate::core::pipeline::RoadmapPipeline;
use crate::domain::model::{LearnerProfile, RoadmapStep};
use crate::domain::ports::{RecordStore, SearchGateway};
use crate::utils::error::Result;

/// Entry point for callers: one request per caller at a time.
pub struct RoadmapEngine<G: SearchGateway, R: RecordStore> {
    pipeline: RoadmapPipeline<G, R>,
    in_flight: InFlightRegistry,
}

impl<G: SearchGateway, R: RecordStore> RoadmapEngine<G, R> {
    pub fn new(pipeline: RoadmapPipeline<G, R>) -> Self {
        Self {
            pipeline,
            in_flight: InFlightRegistry::new(),
        }
    }

    pub async fn submit(&self, caller: &str, profile: LearnerProfile) -> Result<Vec<RoadmapStep>> {
        let _guard = self.in_flight.try_begin(caller)?;
        tracing::info!("Generating roadmap for {}", caller);

        let result = self.pipeline.generate(profile).await;
        match &result {
            Ok(steps) => tracing::info!("Roadmap for {} ready ({} steps)", caller, steps.len()),
            Err(e) if e.is_user_correctable() => {
                tracing::warn!("Roadmap for {} rejected: {}", caller, e)
            }
            Err(e) => tracing::error!(
                "Roadmap for {} failed: {} (kind: {:?})",
                caller,
                e,
                e.kind()
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CommitReceipt, RoadmapRecord, SearchResult};
    use crate::domain::ports::SearchRequest;
    use crate::utils::error::RoadmapError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct SlowGateway;

    #[async_trait]
    impl SearchGateway for SlowGateway {
        async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchResult>> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(vec![SearchResult::new(
                "Rust in Action",
                None,
                "https://example.com/rust",
            )])
        }
    }

    struct AcceptingStore;

    #[async_trait]
    impl RecordStore for AcceptingStore {
        async fn append(&self, record: &RoadmapRecord) -> Result<CommitReceipt> {
            Ok(CommitReceipt {
                record_id: record.id,
                location: "memory".to_string(),
            })
        }
    }

    fn profile() -> LearnerProfile {
        LearnerProfile {
            skills: "Rust".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_concurrent_submission_from_same_caller_rejected() {
        let engine = Arc::new(RoadmapEngine::new(RoadmapPipeline::new(
            SlowGateway,
            AcceptingStore,
        )));

        let first = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.submit("alice", profile()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = engine.submit("alice", profile()).await;
        assert!(matches!(second, Err(RoadmapError::AlreadyInProgress { .. })));

        let steps = first.await.unwrap().unwrap();
        assert_eq!(steps.len(), 1);

        // Flag is cleared once the first request finishes.
        assert!(engine.submit("alice", profile()).await.is_ok());
    }
}
