// file: src/remote/tree.rs
// description: Lists repository file paths through the git trees api
// reference: https://docs.github.com/en/rest/git/trees

use crate::archive::SuffixFilter;
use crate::config::RemoteConfig;
use crate::error::{PipelineError, Result};
use crate::models::RemoteArchiveRef;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
}

pub struct TreeLister {
    client: Client,
    config: RemoteConfig,
}

impl TreeLister {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = super::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Paths in the HEAD tree of `remote` whose name ends with the filter suffix.
    pub async fn list_paths(
        &self,
        remote: &RemoteArchiveRef,
        filter: &SuffixFilter,
    ) -> Result<Vec<String>> {
        let url = remote.tree_url(&self.config.api_base_url);
        debug!("Requesting tree {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::RemoteFetch {
                status: status.as_u16(),
                body,
            });
        }

        let tree: TreeResponse = response.json().await?;
        if tree.truncated {
            info!("Tree listing for {} was truncated by the server", remote);
        }

        let paths: Vec<String> = tree
            .tree
            .into_iter()
            .map(|item| item.path)
            .filter(|path| filter.matches(path))
            .collect();

        info!("Found {} '{}' files in {}", paths.len(), filter.suffix(), remote);
        Ok(paths)
    }
}
