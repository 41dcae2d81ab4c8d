//! Request defaults from TOML (`[request]` section)

use llmgate_domain::{DomainError, ResponseStyle};
use serde::{Deserialize, Serialize};

/// Raw request defaults from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRequestConfig {
    /// Completion timeout in seconds
    pub timeout_secs: u64,
    /// Default style: "concise", "detailed", or absent
    pub style: Option<String>,
    /// Model used when a command does not name one
    pub model: Option<String>,
}

impl Default for FileRequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            style: None,
            model: None,
        }
    }
}

impl FileRequestConfig {
    pub fn parse_style(&self) -> Result<Option<ResponseStyle>, DomainError> {
        ResponseStyle::parse_optional(self.style.as_deref())
    }

    /// Configured default model, ignoring blank values
    pub fn default_model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
