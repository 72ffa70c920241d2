// file: src/analysis/client.rs
// description: file upload, vector store, and file-search response api client
// reference: https://platform.openai.com/docs/api-reference/vector-stores

use crate::analysis::credentials::AnalysisCredentials;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StoreFile {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewResponse {
    pub id: String,
    pub text: String,
    pub raw: Value,
}

pub struct FileSearchClient {
    client: Client,
    base_url: String,
    credentials: AnalysisCredentials,
}

impl FileSearchClient {
    pub fn new(base_url: &str, credentials: AnalysisCredentials) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(
                "Authorization",
                format!("Bearer {}", self.credentials.api_key()),
            )
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Uploads a local file, or a remote one when `source` is an http(s) url.
    pub async fn upload_file(&self, source: &str) -> Result<String> {
        let (file_name, bytes) = if Validator::is_url(source) {
            let response = self.client.get(source).send().await?;
            let response = check_status(response, "download").await?;
            let name = source
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or("document")
                .to_string();
            (name, response.bytes().await?.to_vec())
        } else {
            let path = Path::new(source);
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| PipelineError::file_op(path, e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "document".to_string());
            (name, bytes)
        };

        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let form = Form::new()
            .text("purpose", "assistants")
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .authorized(self.client.post(self.url("/files")))
            .multipart(form)
            .send()
            .await?;
        let uploaded: IdResponse = check_status(response, "file upload").await?.json().await?;

        Ok(uploaded.id)
    }

    pub async fn create_vector_store(&self, name: &str) -> Result<String> {
        let response = self
            .authorized(self.client.post(self.url("/vector_stores")))
            .json(&json!({ "name": name }))
            .send()
            .await?;
        let store: IdResponse = check_status(response, "vector store creation")
            .await?
            .json()
            .await?;

        Ok(store.id)
    }

    pub async fn attach_file(&self, vector_store_id: &str, file_id: &str) -> Result<()> {
        let response = self
            .authorized(
                self.client
                    .post(self.url(&format!("/vector_stores/{}/files", vector_store_id))),
            )
            .json(&json!({ "file_id": file_id }))
            .send()
            .await?;
        check_status(response, "vector store attach").await?;

        Ok(())
    }

    pub async fn list_store_files(&self, vector_store_id: &str) -> Result<Vec<StoreFile>> {
        let response = self
            .authorized(
                self.client
                    .get(self.url(&format!("/vector_stores/{}/files", vector_store_id))),
            )
            .send()
            .await?;
        let list: ListResponse<StoreFile> = check_status(response, "vector store listing")
            .await?
            .json()
            .await?;

        Ok(list.data)
    }

    /// Asks `model` about `input` with file search over the given stores.
    pub async fn create_response(
        &self,
        model: &str,
        input: &str,
        vector_store_ids: &[String],
    ) -> Result<ReviewResponse> {
        let body = json!({
            "model": model,
            "input": input,
            "tools": [{
                "type": "file_search",
                "vector_store_ids": vector_store_ids,
            }],
        });

        let response = self
            .authorized(self.client.post(self.url("/responses")))
            .json(&body)
            .send()
            .await?;
        let raw: Value = check_status(response, "response").await?.json().await?;

        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let text = output_text(&raw);

        Ok(ReviewResponse { id, text, raw })
    }
}

async fn check_status(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(PipelineError::Analysis(format!(
        "{} request failed with status {}: {}",
        operation, status, error_text
    )))
}

/// Concatenates the `output_text` parts of a responses api payload.
fn output_text(raw: &Value) -> String {
    if let Some(text) = raw.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    let mut parts = Vec::new();
    for item in raw
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        for content in item
            .get("content")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            if content.get("type").and_then(Value::as_str) == Some("output_text")
                && let Some(text) = content.get("text").and_then(Value::as_str)
            {
                parts.push(text);
            }
        }
    }

    parts.join("\n")
}
