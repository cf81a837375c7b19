use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::ModelSpec;
use crate::core::errors::RagError;

/// Loads generative models. At most one engine is materialized at a time;
/// loading a new spec supersedes the previous one (depth-1 hot swap).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Load the model at `weights` with the given parameters. The weight path
    /// has already been resolved and checked by the provisioning layer; a
    /// failure here is still a ModelLoadError (unreadable file, bad format,
    /// server refused to start).
    async fn load(
        &self,
        spec: &ModelSpec,
        weights: &Path,
    ) -> Result<Arc<dyn GenerationEngine>, RagError>;
}

/// A loaded generative model.
///
/// `complete` is the synchronous path the orchestrator uses; with
/// temperature > 0 repeated calls may differ, which is expected.
/// `complete_stream` is an optional side channel for incremental token
/// emission; the final text is the concatenation of the emitted chunks.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, RagError>;

    async fn complete_stream(
        &self,
        prompt: &str,
    ) -> Result<mpsc::Receiver<Result<String, RagError>>, RagError>;
}
