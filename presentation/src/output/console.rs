//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use llmgate_application::{BackendError, BackendHealth, CatalogError, SubmitError};
use llmgate_domain::{CatalogView, Completion, ErrorKind};

/// Formats results for a terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a model listing
    pub fn format_models(view: &CatalogView) -> String {
        let mut output = String::new();

        if view.models().is_empty() {
            output.push_str(&format!(
                "{}\n",
                "No models installed. Pull one with `ollama pull <model>`.".yellow()
            ));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                "Models".cyan().bold(),
                format!("({})", view.models().len()).dimmed()
            ));
            for model in view.models() {
                output.push_str(&format!("  {}\n", model));
            }
        }

        if let Some(reason) = view.stale_reason() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Listing may be outdated:".yellow().bold(),
                reason
            ));
        }

        output
    }

    /// Format a completion: a short header line followed by the text
    pub fn format_completion(completion: &Completion) -> String {
        let mut header = completion.model.to_string();
        if let Some(style) = completion.style {
            header.push_str(&format!(" · {}", style));
        }
        header.push_str(&format!(" · {:.2}s", completion.elapsed.as_secs_f64()));

        format!(
            "{}\n{}\n",
            format!("── {} ──", header).yellow().bold(),
            completion.text.trim_end()
        )
    }

    /// Format a failed request
    pub fn format_submit_error(error: &SubmitError) -> String {
        let mut output = Self::error_line(error.kind(), &error.to_string());
        if let Some(hint) = Self::hint(error) {
            output.push_str(&format!("  {} {}\n", "hint:".cyan(), hint));
        }
        output
    }

    pub fn format_catalog_error(error: &CatalogError) -> String {
        let mut output = Self::error_line(ErrorKind::CatalogUnavailable, &error.to_string());
        output.push_str(&format!(
            "  {} is `ollama serve` running?\n",
            "hint:".cyan()
        ));
        output
    }

    pub fn format_health(health: &BackendHealth) -> String {
        format!(
            "{} {} {}\n",
            "ok".green().bold(),
            health.endpoint,
            health
                .version
                .as_deref()
                .map(|v| format!("(ollama {})", v))
                .unwrap_or_default()
                .dimmed()
        )
    }

    pub fn format_health_error(error: &BackendError) -> String {
        Self::error_line(error.kind(), &error.to_string())
    }

    fn error_line(kind: ErrorKind, message: &str) -> String {
        format!(
            "{} {}\n",
            format!("error[{}]:", kind).red().bold(),
            message
        )
    }

    fn hint(error: &SubmitError) -> Option<&'static str> {
        match error {
            SubmitError::ModelNotFound { .. } => {
                Some("run `llmgate models --refresh` to see what is installed")
            }
            SubmitError::CatalogUnavailable(_) | SubmitError::BackendUnreachable(_) => {
                Some("is `ollama serve` running?")
            }
            SubmitError::Timeout(_) => Some("retry with a longer --timeout"),
            _ => None,
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn models(&self, view: &CatalogView) -> String {
        Self::format_models(view)
    }

    fn completion(&self, completion: &Completion) -> String {
        Self::format_completion(completion)
    }

    fn submit_error(&self, error: &SubmitError) -> String {
        Self::format_submit_error(error)
    }

    fn catalog_error(&self, error: &CatalogError) -> String {
        Self::format_catalog_error(error)
    }

    fn health(&self, health: &BackendHealth) -> String {
        Self::format_health(health)
    }

    fn health_error(&self, error: &BackendError) -> String {
        Self::format_health_error(error)
    }
}
