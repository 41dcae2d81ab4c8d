//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: a model installed on the backend
//! - [`prompt::Prompt`]: validated prompt text
//! - [`style::ResponseStyle`]: fixed answer-length modifier
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod prompt;
pub mod style;
