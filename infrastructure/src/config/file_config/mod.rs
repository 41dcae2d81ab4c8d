//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Conversion into application types happens after validation.

mod backend;
mod catalog;
mod logging;
mod output;
mod request;

pub use backend::FileBackendConfig;
pub use catalog::FileCatalogConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use request::FileRequestConfig;

use crate::ollama::OllamaConfig;
use llmgate_application::GatewayParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    ZeroDuration { field: &'static str },

    #[error("backend.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("request.style: unknown value '{0}' (expected concise or detailed)")]
    UnknownStyle(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Ollama connection settings
    pub backend: FileBackendConfig,
    /// Model catalog caching
    pub catalog: FileCatalogConfig,
    /// Per-request defaults
    pub request: FileRequestConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log and transcript files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        let durations = [
            ("backend.connect_timeout_secs", self.backend.connect_timeout_secs),
            ("backend.list_timeout_secs", self.backend.list_timeout_secs),
            ("request.timeout_secs", self.request.timeout_secs),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(ConfigValidationError::ZeroDuration { field });
            }
        }

        if self.request.parse_style().is_err() {
            let style = self.request.style.clone().unwrap_or_default();
            return Err(ConfigValidationError::UnknownStyle(style));
        }

        Ok(())
    }

    /// Catalog and request policy for the session gateway.
    ///
    /// A zero `ttl_secs` is allowed and makes every request refetch the
    /// listing.
    pub fn gateway_params(&self) -> Result<GatewayParams, ConfigValidationError> {
        self.validate()?;
        // validate() has already rejected unknown styles
        let style = self.request.parse_style().ok().flatten();

        Ok(GatewayParams::default()
            .with_catalog_ttl(Duration::from_secs(self.catalog.ttl_secs))
            .with_refresh_interval(
                self.catalog
                    .refresh_interval_secs
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            )
            .with_default_timeout(Duration::from_secs(self.request.timeout_secs))
            .with_default_style(style))
    }

    pub fn ollama_config(&self) -> OllamaConfig {
        self.backend.to_ollama_config()
    }
}
