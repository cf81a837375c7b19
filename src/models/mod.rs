//! Model weight provisioning.
//!
//! A registry maps logical model names to weight files on disk. The
//! orchestrator only sees the `WeightResolver` seam, so alternative
//! provisioning schemes (download managers, test fixtures) slot in without
//! touching orchestration logic.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

/// One registered generative model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    /// Weight file path; relative paths resolve against the project root.
    pub file: PathBuf,
}

/// Resolves a logical model name to an existing, readable weight file.
///
/// The resolved path is guaranteed usable before the generation engine is
/// asked to load it; a missing file is reported here, not retried.
pub trait WeightResolver: Send + Sync {
    fn resolve_model_path(&self, model_name: &str) -> Result<PathBuf, RagError>;
}

pub struct ModelRegistry {
    entries: HashMap<String, ModelEntry>,
    base_dir: PathBuf,
}

impl ModelRegistry {
    pub fn new(entries: Vec<ModelEntry>, base_dir: PathBuf) -> Self {
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

    fn absolute_path(&self, entry: &ModelEntry) -> PathBuf {
        if entry.file.is_absolute() {
            entry.file.clone()
        } else {
            self.base_dir.join(&entry.file)
        }
    }
}

impl WeightResolver for ModelRegistry {
    fn resolve_model_path(&self, model_name: &str) -> Result<PathBuf, RagError> {
        let entry = self.entries.get(model_name).ok_or_else(|| {
            RagError::ModelLoad(format!("unknown model '{}'", model_name))
        })?;

        let path = self.absolute_path(entry);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(RagError::ModelLoad(format!(
                "weight path {} is not a file",
                path.display()
            ))),
            Err(e) => Err(RagError::ModelLoad(format!(
                "weight file {} unreadable: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn resolves_registered_model() {
        let dir = tempfile::tempdir().expect("tempdir");
        let weight_path = dir.path().join("tiny.gguf");
        let mut file = fs::File::create(&weight_path).expect("create");
        file.write_all(b"gguf").expect("write");

        let registry = ModelRegistry::new(
            vec![ModelEntry {
                name: "tiny".to_string(),
                file: PathBuf::from("tiny.gguf"),
            }],
            dir.path().to_path_buf(),
        );

        let resolved = registry.resolve_model_path("tiny").expect("resolve");
        assert_eq!(resolved, weight_path);
    }

    #[test]
    fn unknown_model_is_a_load_error() {
        let registry = ModelRegistry::new(vec![], PathBuf::from("."));
        let err = registry.resolve_model_path("nope").unwrap_err();
        assert_eq!(err.kind(), "model_load");
    }

    #[test]
    fn missing_weight_file_is_a_load_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let registry = ModelRegistry::new(
            vec![ModelEntry {
                name: "ghost".to_string(),
                file: PathBuf::from("ghost.gguf"),
            }],
            dir.path().to_path_buf(),
        );
        let err = registry.resolve_model_path("ghost").unwrap_err();
        assert_eq!(err.kind(), "model_load");
    }
}
