//! OpenAI embedding provider using the `/v1/embeddings` endpoint.

use crate::embeddings::provider::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tutor_core::{AppError, AppResult};

/// Request timeout for embedding calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embedding client.
pub struct OpenAiEmbedder {
    endpoint: String,
    api_key: String,
    model: String,
    dimensions: usize,
    client: reqwest::Client,
}

/// Normalize a base URL into the embeddings endpoint.
fn embeddings_endpoint(base_url: &str) -> String {
    let normalized = base_url.trim_end_matches('/');
    if normalized.ends_with("/embeddings") {
        return normalized.to_string();
    }
    if normalized.ends_with("/v1") {
        return format!("{}/embeddings", normalized);
    }
    format!("{}/v1/embeddings", normalized)
}

impl OpenAiEmbedder {
    /// Create a new embedding client.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: embeddings_endpoint(base_url),
            api_key: api_key.into(),
            model: model.into(),
            dimensions,
            client,
        })
    }

    async fn send(&self, body: &EmbeddingRequest) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!(count = texts.len(), "Requesting embeddings");

        let body = EmbeddingRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
        };

        // One retry on connect/timeout errors; everything else is terminal.
        let response = match self.send(&body).await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!("Transient network failure, retrying once: {}", e);
                self.send(&body)
                    .await
                    .map_err(|e| AppError::Llm(format!("Embedding request failed: {}", e)))?
            }
            Err(e) => return Err(AppError::Llm(format!("Embedding request failed: {}", e))),
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Embedding API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse embedding response: {}", e)))?;

        if api_response.data.len() != texts.len() {
            return Err(AppError::Llm(format!(
                "Embedding response had {} vectors for {} inputs",
                api_response.data.len(),
                texts.len()
            )));
        }

        // The API may reorder results; restore input order by index.
        let mut data = api_response.data;
        data.sort_by_key(|d| d.index);

        for item in &data {
            if item.embedding.len() != self.dimensions {
                return Err(AppError::Llm(format!(
                    "Embedding has {} dimensions, expected {}",
                    item.embedding.len(),
                    self.dimensions
                )));
            }
        }

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}
