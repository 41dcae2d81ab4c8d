//! Domain layer for llmgate
//!
//! This crate contains the value objects and entities of the model session
//! gateway. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Model**: an identifier reported by the backend
//! - **Catalog Snapshot**: one immutable listing of models, superseded by the
//!   next successful refresh
//! - **Completion Request**: model + prompt + optional style + timeout
//! - **Completion**: the response text, or a failure classified by [`ErrorKind`]

pub mod catalog;
pub mod completion;
pub mod core;
pub mod util;

// Re-export commonly used types
pub use catalog::snapshot::{CatalogSnapshot, CatalogView, Freshness};
pub use completion::{
    outcome::{Completion, ErrorKind, RequestPhase},
    request::CompletionRequest,
};
pub use core::{
    error::DomainError,
    model::{DEFAULT_TAG, Model},
    prompt::Prompt,
    style::ResponseStyle,
};
