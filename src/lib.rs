// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod analysis;
pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod remote;
pub mod utils;

pub use archive::{
    ArchiveBuilder, BuildReport, ExtractionReport, SelectiveExtractor, SuffixFilter, clean_archive,
};
pub use config::{AnalysisConfig, Config, PipelineConfig, RemoteConfig};
pub use error::{PipelineError, PipelineStage, Result};
pub use models::{Artifact, RemoteArchiveRef};
pub use pipeline::{PipelineOrchestrator, PipelinePaths, PipelineReport, PipelineStats};
pub use remote::{ArchiveFetcher, FetchedArchive, TreeLister};
pub use utils::{OperationTimer, Validator};
