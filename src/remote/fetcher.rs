// file: src/remote/fetcher.rs
// description: Streams a repository zip archive from the host to local storage
// reference: https://docs.rs/reqwest

use crate::config::RemoteConfig;
use crate::error::{PipelineError, Result};
use crate::models::RemoteArchiveRef;
use crate::pipeline::progress::DownloadProgress;
use crate::utils::files::set_published_permissions;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub struct ArchiveFetcher {
    client: Client,
    config: RemoteConfig,
}

#[derive(Debug, Clone)]
pub struct FetchedArchive {
    pub path: PathBuf,
    pub url: String,
    pub bytes: u64,
    pub fetched_at: DateTime<Utc>,
}

impl ArchiveFetcher {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = super::build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn archive_url(&self, remote: &RemoteArchiveRef) -> String {
        remote.archive_url(&self.config.base_url, &self.config.branch)
    }

    /// Downloads the default-branch archive of `remote`.
    ///
    /// Without a `destination` the archive is written to `<repo>-HEAD.zip` in the current
    /// directory. The body is streamed to a temporary file beside the destination, which
    /// is only renamed into place once the whole body has arrived.
    pub async fn fetch(
        &self,
        remote: &RemoteArchiveRef,
        destination: Option<&Path>,
    ) -> Result<FetchedArchive> {
        let destination = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(remote.default_archive_name()));
        let url = self.archive_url(remote);

        info!("Downloading {} from {}", remote, url);
        let response = self.client.get(&url).send().await?;

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

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| PipelineError::file_op(&parent, e))?;

        let (file, temp_path) = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(&parent)
            .map_err(|e| PipelineError::file_op(&parent, e))?
            .into_parts();
        set_published_permissions(&file).map_err(|e| PipelineError::file_op(&destination, e))?;
        let mut file = tokio::fs::File::from_std(file);

        let progress = DownloadProgress::new(response.content_length(), self.config.show_progress);
        progress.set_message(remote.to_string());

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| PipelineError::file_op(&destination, e))?;
            written += chunk.len() as u64;
            progress.advance(chunk.len() as u64);
        }

        file.flush()
            .await
            .map_err(|e| PipelineError::file_op(&destination, e))?;
        file.sync_all()
            .await
            .map_err(|e| PipelineError::file_op(&destination, e))?;
        drop(file);
        progress.finish();

        temp_path
            .persist(&destination)
            .map_err(|e| PipelineError::file_op(&destination, e.error))?;

        debug!("Wrote {} bytes", written);
        info!("Repository zip downloaded to: {}", destination.display());

        Ok(FetchedArchive {
            path: destination,
            url,
            bytes: written,
            fetched_at: Utc::now(),
        })
    }
}
