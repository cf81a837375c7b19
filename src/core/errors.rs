use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Request-scoped failure taxonomy. Every variant aborts the current request
/// and is surfaced to the caller with its kind and cause.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("model load failed: {0}")]
    ModelLoad(String),
    #[error("similarity index queried before any build")]
    EmptyIndex,
    #[error("top_k must be at least 1 (got {0})")]
    InvalidTopK(usize),
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("prompt template error: {0}")]
    Template(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RagError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        RagError::Internal(err.to_string())
    }

    /// Stable machine-readable kind string used in HTTP bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RagError::Validation(_) => "validation",
            RagError::ModelLoad(_) => "model_load",
            RagError::EmptyIndex => "empty_index",
            RagError::InvalidTopK(_) => "invalid_top_k",
            RagError::Configuration(_) => "configuration",
            RagError::Template(_) => "template",
            RagError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for RagError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RagError::Validation(_)
            | RagError::InvalidTopK(_)
            | RagError::Configuration(_)
            | RagError::Template(_) => StatusCode::BAD_REQUEST,
            RagError::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            RagError::EmptyIndex | RagError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(RagError::Validation("x".into()).kind(), "validation");
        assert_eq!(RagError::EmptyIndex.kind(), "empty_index");
        assert_eq!(RagError::InvalidTopK(0).kind(), "invalid_top_k");
    }

    #[test]
    fn display_includes_cause() {
        let err = RagError::ModelLoad("weights missing".into());
        assert!(err.to_string().contains("weights missing"));
    }
}
