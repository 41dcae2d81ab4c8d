//! Progress notification port
//!
//! Reports the lifecycle phase of a request as the gateway moves it along.

use llmgate_domain::RequestPhase;

/// Callback for request phase transitions.
///
/// Implementations live in the presentation layer (spinner, status line).
pub trait SubmitProgress: Send + Sync {
    fn on_phase(&self, phase: RequestPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoSubmitProgress;

impl SubmitProgress for NoSubmitProgress {
    fn on_phase(&self, _phase: RequestPhase) {}
}
