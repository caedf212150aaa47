
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::embeddings::EmbeddingService;
use crate::{RagError, Result};

/// Client for an OpenAI-compatible `/v1/embeddings` endpoint.
///
/// Makes exactly one attempt per request; retry and backoff are the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    base_url: Url,
    api_key: String,
    model: String,
    batch_size: usize,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    #[inline]
    pub fn new(config: &ServiceConfig, api_key: String) -> Result<Self> {
        let base_url = config
            .service_url()
            .map_err(|e| RagError::Config(e.to_string()))?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key,
            model: config.embedding_model.clone(),
            batch_size: config.batch_size,
            agent,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        self
    }

    fn request_embeddings(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Requesting embeddings for {} texts with model {}",
            inputs.len(),
            self.model
        );

        let url = self
            .base_url
            .join("v1/embeddings")
            .map_err(|e| RagError::Config(format!("invalid embeddings URL: {e}")))?;

        let request = EmbeddingsRequest {
            model: &self.model,
            input: inputs,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| RagError::EmbeddingService(format!("request serialization failed: {e}")))?;

        let response_text = self
            .agent
            .post(url.as_str())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| RagError::EmbeddingService(format!("embeddings request failed: {e}")))?;

        let response: EmbeddingsResponse = serde_json::from_str(&response_text)
            .map_err(|e| RagError::EmbeddingService(format!("malformed embeddings response: {e}")))?;

        if response.data.len() != inputs.len() {
            return Err(RagError::EmbeddingService(format!(
                "embedding count mismatch: requested {}, received {}",
                inputs.len(),
                response.data.len()
            )));
        }

        // The endpoint tags each vector with its input position; order by it
        // rather than trusting response order.
        let mut entries = response.data;
        entries.sort_by_key(|entry| entry.index);

        Ok(entries.into_iter().map(|entry| entry.embedding).collect())
    }
}

impl EmbeddingService for OpenAiEmbeddings {
    #[inline]
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let mut vectors = self.request_embeddings(&input)?;
        vectors
            .pop()
            .ok_or_else(|| RagError::EmbeddingService("empty embeddings response".to_string()))
    }

    #[inline]
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size.max(1)) {
            vectors.extend(self.request_embeddings(batch)?);
        }

        debug!("Received {} embeddings", vectors.len());
        Ok(vectors)
    }
}
