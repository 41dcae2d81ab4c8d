//! JSON output formatter
//!
//! Every result is one pretty-printed document. Failures share the shape
//! `{"error": {"kind", "message", "retryable"}}`.

use crate::output::formatter::OutputFormatter;
use llmgate_application::{BackendError, BackendHealth, CatalogError, SubmitError};
use llmgate_domain::{CatalogView, Completion, ErrorKind};
use serde::Serialize;
use serde_json::json;

pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        match serde_json::to_string_pretty(value) {
            Ok(mut text) => {
                text.push('\n');
                text
            }
            Err(e) => format!("{{\"error\":{{\"kind\":\"serialization\",\"message\":\"{}\"}}}}\n", e),
        }
    }

    fn error(kind: ErrorKind, message: String) -> String {
        Self::render(&json!({
            "error": {
                "kind": kind,
                "message": message,
                "retryable": kind.is_retryable(),
            }
        }))
    }
}

impl OutputFormatter for JsonFormatter {
    fn models(&self, view: &CatalogView) -> String {
        Self::render(&json!({
            "models": view.snapshot().model_ids(),
            "fetched_at": view.snapshot().fetch_time(),
            "freshness": view.freshness(),
        }))
    }

    fn completion(&self, completion: &Completion) -> String {
        Self::render(completion)
    }

    fn submit_error(&self, error: &SubmitError) -> String {
        Self::error(error.kind(), error.to_string())
    }

    fn catalog_error(&self, error: &CatalogError) -> String {
        Self::error(ErrorKind::CatalogUnavailable, error.to_string())
    }

    fn health(&self, health: &BackendHealth) -> String {
        Self::render(health)
    }

    fn health_error(&self, error: &BackendError) -> String {
        Self::error(error.kind(), error.to_string())
    }
}
