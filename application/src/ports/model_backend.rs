//! Model backend port
//!
//! Defines the interface for talking to a local model-serving process.

use async_trait::async_trait;
use llmgate_domain::{ErrorKind, Model};
use thiserror::Error;
use tokio::time::Instant;

/// Errors that can occur during backend operations.
///
/// Cloneable so a single coalesced catalog refresh can hand the same failure
/// to every waiting caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend protocol error: {0}")]
    Protocol(String),

    #[error("Model execution failed: {0}")]
    ModelExecution(String),

    #[error("Deadline exceeded before the backend responded")]
    Timeout,
}

impl BackendError {
    /// Gateway classification of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Unreachable(_) => ErrorKind::BackendUnreachable,
            BackendError::Protocol(_) => ErrorKind::BackendProtocol,
            BackendError::ModelExecution(_) => ErrorKind::ModelExecution,
            BackendError::Timeout => ErrorKind::Timeout,
        }
    }
}

/// Result of a health probe
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BackendHealth {
    /// Where the backend was reached
    pub endpoint: String,
    /// Version reported by the backend, when it reports one
    pub version: Option<String>,
}

/// Local model-serving backend.
///
/// Implementations (adapters) live in the infrastructure layer. They hold no
/// per-request state; every call is independent.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// List the models installed on the backend
    async fn list_models(&self) -> Result<Vec<Model>, BackendError>;

    /// Send a single-turn chat request and return the reply text.
    ///
    /// Implementations must give up with [`BackendError::Timeout`] once
    /// `deadline` passes.
    async fn chat_completion(
        &self,
        model: &Model,
        prompt: &str,
        deadline: Instant,
    ) -> Result<String, BackendError>;

    /// Probe whether the backend is up
    async fn health(&self) -> Result<BackendHealth, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_kinds() {
        assert_eq!(
            BackendError::Unreachable("refused".into()).kind(),
            ErrorKind::BackendUnreachable
        );
        assert_eq!(
            BackendError::Protocol("bad json".into()).kind(),
            ErrorKind::BackendProtocol
        );
        assert_eq!(
            BackendError::ModelExecution("oom".into()).kind(),
            ErrorKind::ModelExecution
        );
        assert_eq!(BackendError::Timeout.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_backend_error_display() {
        let error = BackendError::ModelExecution("model 'x' not found".to_string());
        assert_eq!(error.to_string(), "Model execution failed: model 'x' not found");
    }
}
