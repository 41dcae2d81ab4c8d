//! Error types for the Ollama adapter

use llmgate_application::BackendError;
use llmgate_domain::util::preview;
use thiserror::Error;

/// Errors raised while constructing the adapter.
///
/// Runtime failures are reported as [`BackendError`] through the port.
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Invalid Ollama base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Classify a transport-level failure from reqwest.
pub(crate) fn classify_transport(error: reqwest::Error, endpoint: &str) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else if error.is_connect() {
        BackendError::Unreachable(format!("cannot connect to {}: {}", endpoint, error))
    } else if error.is_decode() || error.is_body() {
        BackendError::Protocol(format!("unreadable reply from {}: {}", endpoint, error))
    } else {
        BackendError::Unreachable(format!("request to {} failed: {}", endpoint, error))
    }
}

/// Error for a reply that did not decode into the expected shape.
pub(crate) fn malformed(what: &str, error: serde_json::Error, body: &[u8]) -> BackendError {
    BackendError::Protocol(format!(
        "malformed {}: {} (body: {})",
        what,
        error,
        preview(&String::from_utf8_lossy(body), 200)
    ))
}
