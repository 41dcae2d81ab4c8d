//! Progress reporting for a pending request

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use llmgate_application::SubmitProgress;
use llmgate_domain::RequestPhase;
use std::time::Duration;

/// Spinner on stderr that follows the request phase.
///
/// Cleared when the request completes or fails so the answer prints on a
/// clean line. Hidden automatically when stderr is not a terminal.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(model: &str) -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(Self::spinner_style());
        bar.set_prefix(model.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_message(phase: RequestPhase) -> String {
        match phase {
            RequestPhase::Dispatched => phase.label().to_string(),
            RequestPhase::Failed => phase.label().red().to_string(),
            other => other.label().dimmed().to_string(),
        }
    }
}

impl SubmitProgress for ProgressReporter {
    fn on_phase(&self, phase: RequestPhase) {
        if phase.is_terminal() {
            self.bar.finish_and_clear();
        } else {
            self.bar.set_message(Self::phase_message(phase));
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
