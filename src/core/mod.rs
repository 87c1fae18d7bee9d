pub mod engine;
pub mod guard;
pub mod pipeline;
pub mod query;
pub mod transform;

pub use crate::domain::model::{
    CommitReceipt, LearnerProfile, RoadmapRecord, RoadmapStep, SearchResult,
};
pub use crate::domain::ports::{
    ConfigProvider, RecordStore, SearchGateway, SearchRequest, Storage,
};
pub use crate::utils::error::Result;
