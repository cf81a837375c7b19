use serde::{Deserialize, Serialize};

/// Load-time and sampling parameters for the generative model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub threads: usize,
    /// Maximum number of generated tokens per completion.
    pub max_tokens: usize,
    pub repeat_penalty: f32,
    pub batch_size: usize,
    /// Sampling width (top-k), distinct from retrieval top-k.
    pub sampling_top_k: usize,
    pub temperature: f32,
}

impl ModelSpec {
    /// Cache identity: the fields whose change invalidates a loaded engine.
    /// Comparison is exact; a temperature move from 0.70 to 0.71 reloads.
    /// `repeat_penalty` and `batch_size` are deliberately excluded.
    pub fn same_identity(&self, other: &ModelSpec) -> bool {
        self.name == other.name
            && self.threads == other.threads
            && self.max_tokens == other.max_tokens
            && self.sampling_top_k == other.sampling_top_k
            && self.temperature == other.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ModelSpec {
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

    #[test]
    fn identity_ignores_repeat_penalty_and_batch() {
        let a = spec();
        let mut b = spec();
        b.repeat_penalty = 1.3;
        b.batch_size = 64;
        assert!(a.same_identity(&b));
    }

    #[test]
    fn identity_is_exact_on_temperature() {
        let a = spec();
        let mut b = spec();
        b.temperature = 0.71;
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn identity_covers_name_threads_tokens_top_k() {
        let a = spec();
        for mutate in [
            |s: &mut ModelSpec| s.name = "other".to_string(),
            |s: &mut ModelSpec| s.threads += 1,
            |s: &mut ModelSpec| s.max_tokens += 1,
            |s: &mut ModelSpec| s.sampling_top_k += 1,
        ] {
            let mut b = spec();
            mutate(&mut b);
            assert!(!a.same_identity(&b));
        }
    }
}
