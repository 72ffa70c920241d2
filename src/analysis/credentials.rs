// file: src/analysis/credentials.rs
// description: explicit api key lookup performed by the entry point before any request
// reference: https://docs.rs/dotenvy

use crate::error::{PipelineError, Result};
use std::fmt;

#[derive(Clone)]
pub struct AnalysisCredentials {
    api_key: String,
}

impl AnalysisCredentials {
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Self::new(value),
            _ => Err(PipelineError::MissingCredential(var.to_string())),
        }
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(PipelineError::MissingCredential("api key".to_string()));
        }
        Ok(Self { api_key })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for AnalysisCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
