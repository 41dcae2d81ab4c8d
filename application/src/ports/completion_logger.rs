//! Port for the completion transcript.
//!
//! Defines the [`CompletionLogger`] trait for recording every finished
//! request (model, prompt, outcome) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! diagnostic messages, while this port captures what was asked and what came
//! back in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured transcript event.
pub struct CompletionEvent {
    /// Event type identifier (e.g., "completion", "completion_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl CompletionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging transcript events.
///
/// `log` is synchronous and infallible; a failing writer must not fail the
/// request it is recording.
pub trait CompletionLogger: Send + Sync {
    fn log(&self, event: CompletionEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoCompletionLogger;

impl CompletionLogger for NoCompletionLogger {
    fn log(&self, _event: CompletionEvent) {}
}
