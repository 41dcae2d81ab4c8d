//! Application layer for llmgate
//!
//! This crate contains the model catalog cache, the session gateway use case,
//! port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod catalog;
pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use catalog::{CatalogError, ModelCatalogCache};
pub use config::GatewayParams;
pub use ports::{
    completion_logger::{CompletionEvent, CompletionLogger, NoCompletionLogger},
    model_backend::{BackendError, BackendHealth, ModelBackend},
    submit_progress::{NoSubmitProgress, SubmitProgress},
};
pub use use_cases::session_gateway::{SessionGateway, SubmitError};
