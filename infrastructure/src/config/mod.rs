//! Configuration loading for llmgate
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. `LLMGATE_*` environment variables (`__` separates sections)
//! 3. `OLLAMA_HOST`
//! 4. Project root: `./llmgate.toml` or `./.llmgate.toml`
//! 5. Global: `$XDG_CONFIG_HOME/llmgate/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileCatalogConfig, FileConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileRequestConfig,
};
pub use loader::{ConfigLoadError, ConfigLoader};
