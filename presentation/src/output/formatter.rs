//! Output formatter trait

use llmgate_application::{BackendError, BackendHealth, CatalogError, SubmitError};
use llmgate_domain::{CatalogView, Completion};

/// Renders command results for stdout and failures for stderr
pub trait OutputFormatter: Send + Sync {
    /// Model listing, with a note when the listing is stale
    fn models(&self, view: &CatalogView) -> String;

    /// A successful completion
    fn completion(&self, completion: &Completion) -> String;

    /// A failed request, with its classification
    fn submit_error(&self, error: &SubmitError) -> String;

    /// A listing that could not be obtained at all
    fn catalog_error(&self, error: &CatalogError) -> String;

    fn health(&self, health: &BackendHealth) -> String;

    fn health_error(&self, error: &BackendError) -> String;
}
