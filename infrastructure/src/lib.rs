//! Infrastructure layer for llmgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Ollama HTTP backend, the JSONL completion
//! transcript, and configuration file loading.

pub mod config;
pub mod logging;
pub mod ollama;

// Re-export commonly used types
pub use config::{
    ConfigLoadError, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig,
    FileOutputFormat,
};
pub use logging::JsonlTranscript;
pub use ollama::{OllamaBackend, OllamaConfig, OllamaError};
