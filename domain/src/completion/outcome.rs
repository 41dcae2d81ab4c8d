//! Completion outcome value objects: the success payload and the error
//! classification shared by every layer.

use crate::core::model::Model;
use crate::core::style::ResponseStyle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Model the request was dispatched to (catalog spelling)
    pub model: Model,
    /// Style that was applied, if any
    pub style: Option<ResponseStyle>,
    /// Response text, as returned by the backend
    pub text: String,
    /// Wall time spent in the backend call
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller error; resubmitting the same input fails the same way
    InvalidRequest,
    /// No model listing could be obtained, not even a stale one
    CatalogUnavailable,
    /// The requested model is not in the catalog
    ModelNotFound,
    /// The backend could not be reached
    BackendUnreachable,
    /// The backend answered with something that is not its protocol
    BackendProtocol,
    /// The backend ran the model and reported a failure
    ModelExecution,
    /// The deadline passed before a response arrived
    Timeout,
    /// The caller cancelled the request
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::CatalogUnavailable => "catalog_unavailable",
            ErrorKind::ModelNotFound => "model_not_found",
            ErrorKind::BackendUnreachable => "backend_unreachable",
            ErrorKind::BackendProtocol => "backend_protocol",
            ErrorKind::ModelExecution => "model_execution",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
        }
    }

    /// Whether resubmitting the same request may succeed.
    ///
    /// `ModelNotFound` counts as retryable: the catalog may have been stale.
    /// `ModelExecution` is not, since the backend already ran the model.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::CatalogUnavailable
                | ErrorKind::BackendUnreachable
                | ErrorKind::ModelNotFound
                | ErrorKind::Timeout
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request lifecycle. Terminal at `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    Received,
    Validated,
    CatalogChecked,
    Dispatched,
    Completed,
    Failed,
}

impl RequestPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestPhase::Completed | RequestPhase::Failed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestPhase::Received => "received",
            RequestPhase::Validated => "validated",
            RequestPhase::CatalogChecked => "catalog checked",
            RequestPhase::Dispatched => "waiting for model",
            RequestPhase::Completed => "completed",
            RequestPhase::Failed => "failed",
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
