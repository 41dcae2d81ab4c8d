//! Interactive chat module
//!
//! Provides a readline-based loop where every line is sent as its own
//! single-shot request.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
