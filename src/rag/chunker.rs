//! Corpus chunking.
//!
//! Splits text into overlapping passages, preferring structural boundaries:
//! paragraph breaks first, then sentence ends, then a hard cut at the
//! chunk-size window. Each passage after the first begins `overlap`
//! characters before the end of its predecessor, so adjacent passages share
//! exactly `overlap` characters and the de-overlapped concatenation
//! reconstructs the source text.

use super::Passage;
use crate::core::errors::RagError;

pub fn split_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<Passage>, RagError> {
    if chunk_size == 0 {
        return Err(RagError::Configuration(
            "chunk_size must be greater than zero".to_string(),
        ));
    }
    if overlap >= chunk_size {
        return Err(RagError::Configuration(format!(
            "overlap ({}) must be smaller than chunk_size ({})",
            overlap, chunk_size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut passages = Vec::new();

    let mut start = 0;
    let mut ordinal = 0;
    while start < total {
        let hard_end = (start + chunk_size).min(total);
        let end = if hard_end == total {
            total
        } else {
            pick_boundary(&chars, start, hard_end, overlap)
        };

        passages.push(Passage {
            text: chars[start..end].iter().collect(),
            offset: start,
            ordinal,
        });
        ordinal += 1;

        if end == total {
            break;
        }
        start = end - overlap;
    }

    Ok(passages)
}

/// Choose a cut position in `(floor, hard_end]` where `floor` keeps the next
/// passage start strictly advancing. Paragraph breaks win over sentence ends;
/// without either the window is cut hard.
fn pick_boundary(chars: &[char], start: usize, hard_end: usize, overlap: usize) -> usize {
    let floor = start + overlap + 1;

    let mut pos = hard_end;
    while pos >= floor && pos >= start + 2 {
        if chars[pos - 1] == '\n' && chars[pos - 2] == '\n' {
            return pos;
        }
        pos -= 1;
    }

    let mut pos = hard_end;
    while pos >= floor && pos >= start + 2 {
        let tail = chars[pos - 2];
        let last = chars[pos - 1];
        if last == '\n' || (matches!(tail, '.' | '!' | '?') && last == ' ') {
            return pos;
        }
        pos -= 1;
    }

    hard_end
}
