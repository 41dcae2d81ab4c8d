//! Catalog configuration from TOML (`[catalog]` section)

use serde::{Deserialize, Serialize};

/// Raw catalog configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Seconds a model listing stays fresh
    pub ttl_secs: u64,
    /// Background refresh period in seconds (0 or absent disables it)
    pub refresh_interval_secs: Option<u64>,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30,
            refresh_interval_secs: None,
        }
    }
}
