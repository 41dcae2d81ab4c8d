//! Domain error types

use thiserror::Error;

/// Domain-level validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Model identifier cannot be empty")]
    EmptyModelId,

    #[error("Unknown response style '{0}' (expected one of: concise, detailed)")]
    UnknownStyle(String),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}
