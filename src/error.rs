// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote fetch failed with status {status}: {body}")]
    RemoteFetch { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid archive {path}: {source}")]
    ArchiveFormat {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analysis service error: {0}")]
    Analysis(String),

    #[error("Missing credential: {0} environment variable is empty")]
    MissingCredential(String),

    #[error("{stage} stage failed: {error}")]
    Stage {
        stage: PipelineStage,
        error: Box<PipelineError>,
    },
}

impl PipelineError {
    pub fn file_op(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }

    pub fn in_stage(self, stage: PipelineStage) -> Self {
        Self::Stage {
            stage,
            error: Box::new(self),
        }
    }

    /// Stage the error was raised in, if it was tagged by the orchestrator.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// HTTP status for fetch failures, looking through stage wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteFetch { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Stage { error, .. } => error.status(),
            _ => None,
        }
    }
}

/// States of the fetch -> extract -> build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Fetching,
    Extracting,
    Building,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "Fetch",
            Self::Extracting => "Extract",
            Self::Building => "Build",
            Self::Done => "Done",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}
