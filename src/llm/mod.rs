pub mod backend;
pub mod llama_server;
pub mod types;

pub use backend::{GenerationBackend, GenerationEngine};
pub use llama_server::LlamaServerBackend;
pub use types::ModelSpec;
