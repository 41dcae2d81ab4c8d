//! Completion transcript.
//!
//! Provides [`JsonlTranscript`], an append-only JSONL writer implementing the
//! [`CompletionLogger`](llmgate_application::CompletionLogger) port.

mod transcript;

pub use transcript::JsonlTranscript;
