//! Presentation-level configuration

use crate::cli::commands::OutputFormat;
use crate::output::{console::ConsoleFormatter, formatter::OutputFormatter, json::JsonFormatter};
use serde::{Deserialize, Serialize};

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

impl OutputConfig {
    /// `--output` wins over the configured format.
    pub fn with_format_override(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    /// Apply the color setting process-wide and build the formatter.
    ///
    /// JSON output is never colored.
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        if !self.color || self.format == OutputFormat::Json {
            colored::control::set_override(false);
        }
        match self.format {
            OutputFormat::Text => Box::new(ConsoleFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_config() {
        let config = OutputConfig {
            format: OutputFormat::Json,
            color: true,
        };
        assert_eq!(
            config.with_format_override(Some(OutputFormat::Text)).format,
            OutputFormat::Text
        );
        assert_eq!(config.with_format_override(None).format, OutputFormat::Json);
    }
}
