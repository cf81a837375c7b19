use std::collections::HashSet;

use super::service::AppConfig;
use crate::core::errors::RagError;

/// Startup validation of the loaded configuration. Rejects limits and
/// registry entries that would make every request fail later.
pub fn validate_config(config: &AppConfig) -> Result<(), RagError> {
    if config.retrieval.max_top_k < 1 {
        return Err(RagError::Configuration(
            "retrieval.max_top_k must be at least 1".to_string(),
        ));
    }

    let mut model_names = HashSet::new();
    for entry in &config.models {
        if entry.name.trim().is_empty() {
            return Err(RagError::Configuration(
                "model entry with empty name".to_string(),
            ));
        }
        if entry.file.as_os_str().is_empty() {
            return Err(RagError::Configuration(format!(
                "model '{}' has no weight file",
                entry.name
            )));
        }
        if !model_names.insert(entry.name.as_str()) {
            return Err(RagError::Configuration(format!(
                "duplicate model name '{}'",
                entry.name
            )));
        }
    }

    let mut dataset_names = HashSet::new();
    for entry in &config.datasets {
        if entry.name.trim().is_empty() {
            return Err(RagError::Configuration(
                "dataset entry with empty name".to_string(),
            ));
        }
        if entry.file.as_os_str().is_empty() {
            return Err(RagError::Configuration(format!(
                "dataset '{}' has no corpus file",
                entry.name
            )));
        }
        if !dataset_names.insert(entry.name.as_str()) {
            return Err(RagError::Configuration(format!(
                "duplicate dataset name '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::corpus::DatasetEntry;
    use crate::models::ModelEntry;

    #[test]
    fn rejects_duplicate_model_names() {
        let mut config = AppConfig::default();
        config.models = vec![
            ModelEntry {
                name: "m".to_string(),
                file: PathBuf::from("a.gguf"),
            },
            ModelEntry {
                name: "m".to_string(),
                file: PathBuf::from("b.gguf"),
            },
        ];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_dataset_without_file() {
        let mut config = AppConfig::default();
        config.datasets = vec![DatasetEntry {
            name: "d".to_string(),
            file: PathBuf::new(),
        }];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_top_k_bound() {
        let mut config = AppConfig::default();
        config.retrieval.max_top_k = 0;
        assert!(validate_config(&config).is_err());
    }
}
