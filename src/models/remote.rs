// file: src/models/remote.rs
// description: reference to a hosted repository and the urls derived from it
// reference: internal data structures

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArchiveRef {
    pub owner: String,
    pub repo: String,
}

impl RemoteArchiveRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();

        if owner.trim().is_empty() {
            return Err(PipelineError::Validation("owner must not be empty".to_string()));
        }
        if repo.trim().is_empty() {
            return Err(PipelineError::Validation(
                "repository name must not be empty".to_string(),
            ));
        }

        Ok(Self { owner, repo })
    }

    /// `{base}/{owner}/{repo}/archive/refs/heads/{branch}.zip`
    pub fn archive_url(&self, base_url: &str, branch: &str) -> String {
        format!(
            "{}/{}/{}/archive/refs/heads/{}.zip",
            base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            branch
        )
    }

    pub fn tree_url(&self, api_base_url: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/HEAD?recursive=1",
            api_base_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    /// File name used for the raw download when no destination is given.
    pub fn default_archive_name(&self) -> String {
        format!("{}-HEAD.zip", self.repo)
    }

    pub fn cleaned_archive_name(&self) -> String {
        format!("cleaned_{}.zip", self.repo)
    }
}

impl fmt::Display for RemoteArchiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
