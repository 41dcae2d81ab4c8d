//! Backend configuration from TOML (`[backend]` section)

use crate::ollama::{DEFAULT_BASE_URL, OllamaConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Ollama base URL; `OLLAMA_HOST` overrides the files
    pub base_url: String,
    /// TCP connect limit in seconds
    pub connect_timeout_secs: u64,
    /// Limit for model listing and health calls in seconds
    pub list_timeout_secs: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 5,
            list_timeout_secs: 10,
        }
    }
}

impl FileBackendConfig {
    pub fn to_ollama_config(&self) -> OllamaConfig {
        OllamaConfig {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            list_timeout: Duration::from_secs(self.list_timeout_secs),
        }
    }
}
