use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use super::paths::AppPaths;
use super::validation::validate_config;
use crate::core::errors::RagError;
use crate::corpus::DatasetEntry;
use crate::models::ModelEntry;

/// Application configuration, loaded from `config.yml`.
///
/// The `models` and `datasets` tables are the injected lookup registries:
/// new models or corpora are added here without touching orchestration code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llama: LlamaConfig,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// 0 selects an ephemeral port.
    #[serde(default)]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Upper bound on the per-request retrieval top-k.
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_top_k: default_max_top_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlamaConfig {
    /// Explicit llama-server binary path; discovered on PATH when unset.
    #[serde(default)]
    pub server_binary: Option<PathBuf>,
    #[serde(default = "default_llama_port")]
    pub port: u16,
    /// Base URL of the embedding llama-server instance.
    #[serde(default = "default_embedding_endpoint")]
    pub embedding_endpoint: String,
    #[serde(default = "default_n_ctx")]
    pub n_ctx: usize,
}

impl Default for LlamaConfig {
    fn default() -> Self {
        Self {
            server_binary: None,
            port: default_llama_port(),
            embedding_endpoint: default_embedding_endpoint(),
            n_ctx: default_n_ctx(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_top_k() -> usize {
    10
}

fn default_llama_port() -> u16 {
    8088
}

fn default_embedding_endpoint() -> String {
    "http://127.0.0.1:8090".to_string()
}

fn default_n_ctx() -> usize {
    4096
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("RAGCHAT_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        self.paths.project_root.join("config.yml")
    }

    /// Load and validate the configuration. A missing file yields defaults;
    /// a malformed file is a ConfigurationError.
    pub fn load(&self) -> Result<AppConfig, RagError> {
        let path = self.config_path();
        if !path.exists() {
            tracing::warn!("No config file at {}; using defaults", path.display());
            let config = AppConfig::default();
            validate_config(&config)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            RagError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_yaml::from_str(&contents).map_err(|e| {
            RagError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })?;

        validate_config(&config)?;
        Ok(config)
    }
}
