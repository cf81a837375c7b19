//! Corpus provisioning.
//!
//! Mirrors the model registry: logical dataset names map to text files whose
//! full body is handed to the index builder. Fetching or refreshing that text
//! is outside the orchestration core.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

/// One registered text corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    /// Corpus file path; relative paths resolve against the project root.
    pub file: PathBuf,
}

#[async_trait]
pub trait CorpusProvider: Send + Sync {
    /// Return the full raw text body for a dataset.
    async fn resolve_corpus_text(&self, dataset: &str) -> Result<String, RagError>;
}

pub struct DatasetRegistry {
    entries: HashMap<String, DatasetEntry>,
    base_dir: PathBuf,
}

impl DatasetRegistry {
    pub fn new(entries: Vec<DatasetEntry>, base_dir: PathBuf) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Self { entries, base_dir }
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl CorpusProvider for DatasetRegistry {
    async fn resolve_corpus_text(&self, dataset: &str) -> Result<String, RagError> {
        let entry = self.entries.get(dataset).ok_or_else(|| {
            RagError::Configuration(format!("unknown dataset '{}'", dataset))
        })?;

        let path = if entry.file.is_absolute() {
            entry.file.clone()
        } else {
            self.base_dir.join(&entry.file)
        };

        tokio::fs::read_to_string(&path).await.map_err(|e| {
            RagError::Configuration(format!(
                "failed to read corpus {}: {}",
                path.display(),
                e
            ))
        })
    }
}
