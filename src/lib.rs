pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::search::GoogleSearchGateway;
pub use adapters::storage::{FileRecordStore, LocalStorage};
pub use adapters::supabase::SupabaseRecordStore;
pub use config::toml_config::TomlConfig;
pub use crate::core::{engine::RoadmapEngine, pipeline::RoadmapPipeline};
pub use domain::model::{LearnerProfile, RoadmapRecord, RoadmapStep, SearchResult};
pub use utils::error::{FailureKind, Result, RoadmapError};
