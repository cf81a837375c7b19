//! Embedding provider seam.
//!
//! Corpus passages and queries are embedded through the same provider; for a
//! fixed provider configuration `embed` must be a pure function of its input
//! text, otherwise stored vectors and query vectors drift apart.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::errors::RagError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text into a fixed-dimension vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
}

/// Embedding over HTTP against a llama-server `/embedding` endpoint.
pub struct HttpEmbeddingProvider {
    client: Client,
    endpoint: String,
}

impl HttpEmbeddingProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let url = format!("{}/embedding", self.endpoint.trim_end_matches('/'));
        let body = json!({ "content": text });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(RagError::internal)?;

        if !res.status().is_success() {
            return Err(RagError::Internal(format!(
                "embedding server error: {}",
                res.status()
            )));
        }

        let data: Value = res.json().await.map_err(RagError::internal)?;
        let embedding: Vec<f32> = serde_json::from_value(data["embedding"].clone())
            .map_err(|_| RagError::Internal("invalid embedding response".to_string()))?;

        if embedding.is_empty() {
            return Err(RagError::Internal("empty embedding returned".to_string()));
        }

        Ok(embedding)
    }
}
