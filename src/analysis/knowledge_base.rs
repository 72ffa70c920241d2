// file: src/analysis/knowledge_base.rs
// description: indexes extracted sources into a vector store and reviews documents against it
// reference: https://docs.rs/walkdir

use crate::analysis::client::{FileSearchClient, ReviewResponse, StoreFile};
use crate::config::AnalysisConfig;
use crate::error::{PipelineError, Result};
use crate::utils::{OperationTimer, Validator};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct IndexedStore {
    pub vector_store_id: String,
    pub file_ids: Vec<String>,
    pub files: Vec<StoreFile>,
}

pub struct KnowledgeBase<'a> {
    client: &'a FileSearchClient,
    store_name: String,
}

impl<'a> KnowledgeBase<'a> {
    pub fn new(client: &'a FileSearchClient, store_name: &str) -> Self {
        Self {
            client,
            store_name: store_name.to_string(),
        }
    }

    /// Regular files under `dir` in lexicographic order.
    pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
        Validator::validate_directory(dir)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| PipelineError::file_op(dir, std::io::Error::from(e)))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Creates a store and uploads every file under `dir` into it, one at a time.
    pub async fn index_directory(&self, dir: &Path) -> Result<IndexedStore> {
        let files = Self::collect_files(dir)?;
        let timer = OperationTimer::new("index");

        let vector_store_id = self.client.create_vector_store(&self.store_name).await?;
        info!("Created vector store {}", vector_store_id);

        let mut file_ids = Vec::with_capacity(files.len());
        for path in &files {
            let source = path.to_string_lossy();
            let file_id = self.client.upload_file(&source).await?;
            self.client.attach_file(&vector_store_id, &file_id).await?;
            info!("Uploaded {} as {}", path.display(), file_id);
            file_ids.push(file_id);
        }

        let stored = self.client.list_store_files(&vector_store_id).await?;
        timer.finish_with_count(file_ids.len());

        Ok(IndexedStore {
            vector_store_id,
            file_ids,
            files: stored,
        })
    }
}

pub struct DocumentReviewer<'a> {
    client: &'a FileSearchClient,
    config: AnalysisConfig,
}

impl<'a> DocumentReviewer<'a> {
    pub fn new(client: &'a FileSearchClient, config: AnalysisConfig) -> Self {
        Self { client, config }
    }

    /// Preamble and document joined by CRLF.
    pub fn build_prompt(preamble: &str, document: &str) -> String {
        [preamble, document].join("\r\n")
    }

    pub async fn review(&self, document: &Path, vector_store_id: &str) -> Result<ReviewResponse> {
        Validator::validate_file_path(document)?;
        let content = tokio::fs::read_to_string(document)
            .await
            .map_err(|e| PipelineError::file_op(document, e))?;
        Validator::validate_content_not_empty(&content)?;

        let prompt = Self::build_prompt(&self.config.prompt_preamble, &content);
        info!(
            "Reviewing {} against vector store {}",
            document.display(),
            vector_store_id
        );

        let timer = OperationTimer::new("review");
        let response = self
            .client
            .create_response(&self.config.model, &prompt, &[vector_store_id.to_string()])
            .await?;
        timer.finish();

        Ok(response)
    }
}
