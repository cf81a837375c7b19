mod paths;
mod service;
mod validation;

pub use paths::AppPaths;
pub use service::{AppConfig, ConfigService, LlamaConfig, RetrievalConfig, ServerConfig};
pub use validation::validate_config;
