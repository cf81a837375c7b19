//! Top-level RAG coordination.
//!
//! Each request runs the same sequence: validate, ensure the generation
//! engine and corpus index match the requested specs (rebuilding lazily
//! through `ResourceCache`), retrieve, build the prompt, generate. The
//! rebuild-and-swap section is serialized behind a single-writer lock so a
//! half-applied swap is never observable; retrieval and generation run on
//! cloned handles outside the lock.

pub mod cache;
pub mod request;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::errors::RagError;
use crate::corpus::CorpusProvider;
use crate::embedding::EmbeddingProvider;
use crate::llm::{GenerationBackend, GenerationEngine};
use crate::models::WeightResolver;
use crate::prompt;
use crate::rag::CorpusIndex;

pub use cache::ResourceCache;
pub use request::{RagRequest, RagResponse};

pub struct RagOrchestrator {
    weights: Arc<dyn WeightResolver>,
    corpora: Arc<dyn CorpusProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn GenerationBackend>,
    resources: Mutex<Resources>,
    metrics: Metrics,
    max_top_k: usize,
}

/// The retained expensive resources: at most one engine and one index.
#[derive(Default)]
struct Resources {
    cache: ResourceCache,
    engine: Option<Arc<dyn GenerationEngine>>,
    index: Option<Arc<CorpusIndex>>,
}

#[derive(Default)]
struct Metrics {
    model_loads: AtomicU64,
    index_builds: AtomicU64,
}

/// Instrumentation snapshot exposed over the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorStatus {
    pub model_loads: u64,
    pub index_builds: u64,
    pub indexed_passages: usize,
}

impl RagOrchestrator {
    pub fn new(
        weights: Arc<dyn WeightResolver>,
        corpora: Arc<dyn CorpusProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        backend: Arc<dyn GenerationBackend>,
        max_top_k: usize,
    ) -> Self {
        Self {
            weights,
            corpora,
            embedder,
            backend,
            resources: Mutex::new(Resources::default()),
            metrics: Metrics::default(),
            max_top_k,
        }
    }

    pub async fn handle(&self, request: RagRequest) -> Result<RagResponse, RagError> {
        request.validate(self.max_top_k)?;

        let request_id = Uuid::new_v4();
        tracing::info!(
            %request_id,
            model = %request.model,
            dataset = %request.dataset,
            rag = request.rag_enabled,
            "handling chat request"
        );

        let model_spec = request.model_spec();
        let corpus_spec = request.corpus_spec();

        let (engine, index) = {
            let mut resources = self.resources.lock().await;

            if resources.cache.should_reload_model(&model_spec) {
                let weights = self.weights.resolve_model_path(&model_spec.name)?;
                let engine = self.backend.load(&model_spec, &weights).await?;
                resources.engine = Some(engine);
                resources.cache.commit_model(model_spec.clone());
                self.metrics.model_loads.fetch_add(1, Ordering::SeqCst);
                tracing::info!(%request_id, model = %model_spec.name, "generation engine loaded");
            }

            if resources.cache.should_rebuild_index(&corpus_spec) {
                let corpus_text = self
                    .corpora
                    .resolve_corpus_text(&corpus_spec.dataset)
                    .await?;
                // Build fully before swapping; on failure the prior index
                // stays active and committed.
                let built =
                    CorpusIndex::build(corpus_spec.clone(), &corpus_text, Arc::clone(&self.embedder))
                        .await?;
                resources.index = Some(Arc::new(built));
                resources.cache.commit_corpus(corpus_spec.clone());
                self.metrics.index_builds.fetch_add(1, Ordering::SeqCst);
                tracing::info!(%request_id, dataset = %corpus_spec.dataset, "corpus index rebuilt");
            }

            let engine = resources.engine.clone().ok_or_else(|| {
                RagError::Internal("generation engine unavailable after load".to_string())
            })?;
            (engine, resources.index.clone())
        };

        let retrieved = if request.rag_enabled {
            let index = index.ok_or(RagError::EmptyIndex)?;
            Some(index.query(&request.query, request.top_k).await?)
        } else {
            None
        };

        let context = retrieved.as_ref().map(|passages| {
            passages
                .iter()
                .map(|p| p.passage.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        });

        let prompt = prompt::build(&request.query, context.as_deref(), request.rag_enabled)?;
        let text = engine.complete(&prompt).await?;

        tracing::info!(%request_id, response_chars = text.len(), "chat request completed");

        Ok(RagResponse {
            text,
            context: if request.verbosity { retrieved } else { None },
            prompt: if request.verbosity { Some(prompt) } else { None },
        })
    }

    pub async fn status(&self) -> OrchestratorStatus {
        let resources = self.resources.lock().await;
        OrchestratorStatus {
            model_loads: self.metrics.model_loads.load(Ordering::SeqCst),
            index_builds: self.metrics.index_builds.load(Ordering::SeqCst),
            indexed_passages: resources.index.as_ref().map(|i| i.len()).unwrap_or(0),
        }
    }
}
