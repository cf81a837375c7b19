//! Last-applied spec tracking for the two expensive resources.
//!
//! Pure comparison logic: `should_*` answers true on the first call or on any
//! identity-field mismatch against the last committed spec. The caller
//! commits a spec only after the corresponding rebuild succeeded, so a failed
//! rebuild never shifts the baseline.

use crate::llm::ModelSpec;
use crate::rag::CorpusSpec;

#[derive(Default)]
pub struct ResourceCache {
    model: Option<ModelSpec>,
    corpus: Option<CorpusSpec>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_reload_model(&self, spec: &ModelSpec) -> bool {
        match &self.model {
            Some(current) => !current.same_identity(spec),
            None => true,
        }
    }

    pub fn should_rebuild_index(&self, spec: &CorpusSpec) -> bool {
        match &self.corpus {
            Some(current) => current != spec,
            None => true,
        }
    }

    pub fn commit_model(&mut self, spec: ModelSpec) {
        self.model = Some(spec);
    }

    pub fn commit_corpus(&mut self, spec: CorpusSpec) {
        self.corpus = Some(spec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_spec() -> ModelSpec {
        ModelSpec {
            name: "tiny".to_string(),
            threads: 4,
            max_tokens: 512,
            repeat_penalty: 1.1,
            batch_size: 512,
            sampling_top_k: 40,
            temperature: 0.7,
        }
    }

    fn corpus_spec() -> CorpusSpec {
        CorpusSpec {
            dataset: "notes".to_string(),
            chunk_size: 500,
            overlap: 50,
        }
    }

    #[test]
    fn first_call_always_reloads() {
        let cache = ResourceCache::new();
        assert!(cache.should_reload_model(&model_spec()));
        assert!(cache.should_rebuild_index(&corpus_spec()));
    }

    #[test]
    fn identical_spec_after_commit_is_a_hit() {
        let mut cache = ResourceCache::new();
        cache.commit_model(model_spec());
        cache.commit_corpus(corpus_spec());
        assert!(!cache.should_reload_model(&model_spec()));
        assert!(!cache.should_rebuild_index(&corpus_spec()));
    }

    #[test]
    fn numeric_comparison_is_exact() {
        let mut cache = ResourceCache::new();
        cache.commit_model(model_spec());

        let mut warmer = model_spec();
        warmer.temperature = 0.71;
        assert!(cache.should_reload_model(&warmer));
    }

    #[test]
    fn any_corpus_field_change_invalidates() {
        let mut cache = ResourceCache::new();
        cache.commit_corpus(corpus_spec());

        let mut other = corpus_spec();
        other.overlap = 49;
        assert!(cache.should_rebuild_index(&other));

        let mut other = corpus_spec();
        other.dataset = "manuals".to_string();
        assert!(cache.should_rebuild_index(&other));
    }

    #[test]
    fn uncommitted_failure_keeps_the_baseline() {
        let mut cache = ResourceCache::new();
        cache.commit_corpus(corpus_spec());

        // A rebuild for this spec failed somewhere: nothing was committed,
        // so the old spec still answers "no rebuild needed".
        let mut failed = corpus_spec();
        failed.chunk_size = 900;
        assert!(cache.should_rebuild_index(&failed));
        assert!(!cache.should_rebuild_index(&corpus_spec()));
    }
}
