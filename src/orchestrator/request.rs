use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;
use crate::llm::ModelSpec;
use crate::rag::{CorpusSpec, ScoredPassage};

/// One chat request. Immutable per invocation; every tunable has a default
/// matching the interactive layer's slider defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RagRequest {
    pub query: String,
    pub model: String,
    pub dataset: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_true")]
    pub rag_enabled: bool,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_repeat_penalty")]
    pub repeat_penalty: f32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_sampling_top_k")]
    pub sampling_top_k: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// When set, the response echoes the retrieved context and the exact
    /// prompt that reached the model.
    #[serde(default)]
    pub verbosity: bool,
}

fn default_top_k() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

fn default_threads() -> usize {
    4
}

fn default_max_tokens() -> usize {
    512
}

fn default_repeat_penalty() -> f32 {
    1.1
}

fn default_batch_size() -> usize {
    512
}

fn default_sampling_top_k() -> usize {
    40
}

fn default_temperature() -> f32 {
    0.7
}

impl RagRequest {
    /// Fail-fast request validation; nothing expensive runs on a bad shape.
    pub fn validate(&self, max_top_k: usize) -> Result<(), RagError> {
        if self.query.trim().is_empty() {
            return Err(RagError::Validation("query must not be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(RagError::Validation("model must not be empty".to_string()));
        }
        if self.dataset.trim().is_empty() {
            return Err(RagError::Validation(
                "dataset must not be empty".to_string(),
            ));
        }
        if self.top_k < 1 || self.top_k > max_top_k {
            return Err(RagError::Validation(format!(
                "top_k must be within 1..={} (got {})",
                max_top_k, self.top_k
            )));
        }
        if self.chunk_size == 0 {
            return Err(RagError::Validation(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagError::Validation(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        if self.threads < 1 {
            return Err(RagError::Validation(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.max_tokens < 1 {
            return Err(RagError::Validation(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        if !(self.temperature >= 0.0) {
            return Err(RagError::Validation(
                "temperature must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn model_spec(&self) -> ModelSpec {
        ModelSpec {
            name: self.model.clone(),
            threads: self.threads,
            max_tokens: self.max_tokens,
            repeat_penalty: self.repeat_penalty,
            batch_size: self.batch_size,
            sampling_top_k: self.sampling_top_k,
            temperature: self.temperature,
        }
    }

    pub fn corpus_spec(&self) -> CorpusSpec {
        CorpusSpec {
            dataset: self.dataset.clone(),
            chunk_size: self.chunk_size,
            overlap: self.overlap,
        }
    }
}

/// The generated answer, plus the retrieval trace when verbosity was
/// requested.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<ScoredPassage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RagRequest {
        serde_json::from_value(serde_json::json!({
            "query": "How do I reset the robot?",
            "model": "tiny",
            "dataset": "robot-maintenance",
        }))
        .expect("deserialize")
    }

    #[test]
    fn defaults_fill_in_and_validate() {
        let req = request();
        assert_eq!(req.chunk_size, 500);
        assert_eq!(req.overlap, 50);
        assert_eq!(req.top_k, 2);
        assert!(req.rag_enabled);
        assert!(!req.verbosity);
        assert!(req.validate(10).is_ok());
    }

    #[test]
    fn rejects_blank_query() {
        let mut req = request();
        req.query = "  ".to_string();
        assert_eq!(req.validate(10).unwrap_err().kind(), "validation");
    }

    #[test]
    fn rejects_top_k_out_of_bound() {
        let mut req = request();
        req.top_k = 0;
        assert!(req.validate(10).is_err());
        req.top_k = 11;
        assert!(req.validate(10).is_err());
        req.top_k = 10;
        assert!(req.validate(10).is_ok());
    }

    #[test]
    fn rejects_overlap_not_smaller_than_chunk_size() {
        let mut req = request();
        req.chunk_size = 500;
        req.overlap = 600;
        assert!(req.validate(10).is_err());
        req.overlap = 500;
        assert!(req.validate(10).is_err());
        req.overlap = 499;
        assert!(req.validate(10).is_ok());
    }

    #[test]
    fn rejects_nan_temperature() {
        let mut req = request();
        req.temperature = f32::NAN;
        assert!(req.validate(10).is_err());
    }

    #[test]
    fn specs_carry_request_parameters() {
        let req = request();
        let model = req.model_spec();
        assert_eq!(model.name, "tiny");
        assert_eq!(model.sampling_top_k, 40);
        let corpus = req.corpus_spec();
        assert_eq!(corpus.dataset, "robot-maintenance");
        assert_eq!(corpus.chunk_size, 500);
    }
}
