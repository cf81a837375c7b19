pub mod chunker;
pub mod index;

use serde::{Deserialize, Serialize};

/// Identity-bearing configuration of the corpus index. Changing any field
/// invalidates a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSpec {
    pub dataset: String,
    /// Maximum passage length in characters.
    pub chunk_size: usize,
    /// Characters shared between adjacent passages; must be < chunk_size.
    pub overlap: usize,
}

/// A bounded slice of corpus text used as a retrieval unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    /// Character offset of this passage in the source corpus.
    pub offset: usize,
    /// Position in corpus order; ties in similarity rank on this.
    pub ordinal: usize,
}

/// One retrieved passage with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f32,
}

pub use index::CorpusIndex;
