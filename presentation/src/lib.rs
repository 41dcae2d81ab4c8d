//! Presentation layer for llmgate
//!
//! This crate contains CLI definitions, output formatters,
//! the progress spinner, and the interactive chat loop.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand};
pub use cli::commands::{Cli, Command, OutputFormat};
pub use config::OutputConfig;
pub use output::{console::ConsoleFormatter, formatter::OutputFormatter, json::JsonFormatter};
pub use progress::reporter::ProgressReporter;
