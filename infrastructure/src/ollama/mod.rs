//! Ollama HTTP adapter
//!
//! Implements [`ModelBackend`](llmgate_application::ModelBackend) over the
//! local Ollama REST API.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{DEFAULT_BASE_URL, OllamaBackend, OllamaConfig, normalize_base_url};
pub use error::OllamaError;
