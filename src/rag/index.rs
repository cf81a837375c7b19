//! In-memory similarity index over chunked corpus passages.
//!
//! The corpus in scope is small enough for brute-force cosine search; the
//! index is rebuilt wholesale whenever its spec changes, never mutated.

use std::sync::Arc;

use super::chunker::split_text;
use super::{CorpusSpec, Passage, ScoredPassage};
use crate::core::errors::RagError;
use crate::embedding::EmbeddingProvider;

pub struct CorpusIndex {
    spec: CorpusSpec,
    passages: Vec<Passage>,
    vectors: Vec<Vec<f32>>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusIndex")
            .field("spec", &self.spec)
            .field("passages", &self.passages)
            .field("vectors", &self.vectors)
            .finish_non_exhaustive()
    }
}

impl CorpusIndex {
    /// Chunk `corpus_text` under `spec` and embed every passage. Building is
    /// deterministic for a fixed spec and corpus; a failed build leaves no
    /// partially-filled index behind (the caller only swaps on success).
    pub async fn build(
        spec: CorpusSpec,
        corpus_text: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        if corpus_text.trim().is_empty() {
            return Err(RagError::Configuration(format!(
                "dataset '{}' has no corpus text to index",
                spec.dataset
            )));
        }

        let passages = split_text(corpus_text, spec.chunk_size, spec.overlap)?;

        let mut vectors = Vec::with_capacity(passages.len());
        for passage in &passages {
            vectors.push(embedder.embed(&passage.text).await?);
        }

        tracing::info!(
            "Indexed dataset '{}': {} passages (chunk_size={}, overlap={})",
            spec.dataset,
            passages.len(),
            spec.chunk_size,
            spec.overlap
        );

        Ok(Self {
            spec,
            passages,
            vectors,
            embedder,
        })
    }

    pub fn spec(&self) -> &CorpusSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Retrieve the `top_k` most similar passages, descending by score.
    /// Ties keep corpus order. A `top_k` beyond the passage count clamps to
    /// what is available rather than failing.
    pub async fn query(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredPassage>, RagError> {
        if top_k < 1 {
            return Err(RagError::InvalidTopK(top_k));
        }
        if self.passages.is_empty() {
            return Err(RagError::EmptyIndex);
        }

        let query_vector = self.embedder.embed(text).await?;

        let mut scored: Vec<ScoredPassage> = self
            .passages
            .iter()
            .zip(self.vectors.iter())
            .map(|(passage, vector)| ScoredPassage {
                passage: passage.clone(),
                score: cosine_similarity(&query_vector, vector),
            })
            .collect();

        // Stable sort: equal scores stay in corpus order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k.min(self.passages.len()));

        Ok(scored)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
