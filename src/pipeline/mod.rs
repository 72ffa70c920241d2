// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
pub mod progress;

pub use orchestrator::{PipelineOrchestrator, PipelinePaths, PipelineReport};
pub use progress::{DownloadProgress, PipelineStats};
