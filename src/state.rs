use std::sync::Arc;

use crate::core::config::{AppConfig, AppPaths, ConfigService};
use crate::core::errors::RagError;
use crate::corpus::DatasetRegistry;
use crate::embedding::HttpEmbeddingProvider;
use crate::llm::LlamaServerBackend;
use crate::models::ModelRegistry;
use crate::orchestrator::RagOrchestrator;

/// Global application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub models: Arc<ModelRegistry>,
    pub datasets: Arc<DatasetRegistry>,
    pub orchestrator: Arc<RagOrchestrator>,
}

impl AppState {
    /// Wire configuration into registries, providers and the orchestrator.
    pub fn initialize() -> Result<Arc<Self>, RagError> {
        let paths = Arc::new(AppPaths::new());
        let config = ConfigService::new(paths.clone()).load()?;

        let models = Arc::new(ModelRegistry::new(
            config.models.clone(),
            paths.project_root.clone(),
        ));
        let datasets = Arc::new(DatasetRegistry::new(
            config.datasets.clone(),
            paths.project_root.clone(),
        ));

        let embedder = Arc::new(HttpEmbeddingProvider::new(
            config.llama.embedding_endpoint.clone(),
        ));
        let backend = Arc::new(LlamaServerBackend::new(&config.llama, &paths.project_root)?);

        let orchestrator = Arc::new(RagOrchestrator::new(
            models.clone(),
            datasets.clone(),
            embedder,
            backend,
            config.retrieval.max_top_k,
        ));

        tracing::info!(
            "State initialized: {} models, {} datasets registered",
            models.names().len(),
            datasets.names().len()
        );

        Ok(Arc::new(AppState {
            paths,
            config,
            models,
            datasets,
            orchestrator,
        }))
    }
}
