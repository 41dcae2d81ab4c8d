//! Completion request entity

use crate::core::error::DomainError;
use crate::core::prompt::Prompt;
use crate::core::style::ResponseStyle;
use std::time::Duration;

/// One user submission: which model, what to ask, how, and how long to wait.
///
/// Consumed once by the gateway; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    model_id: String,
    prompt: Prompt,
    style: Option<ResponseStyle>,
    timeout: Duration,
}

impl CompletionRequest {
    /// Build a request from typed parts.
    ///
    /// The model identifier is checked for emptiness only; whether it names
    /// an installed model is decided against the catalog at dispatch time.
    pub fn new(
        model_id: impl Into<String>,
        prompt: Prompt,
        style: Option<ResponseStyle>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let model_id = model_id.into().trim().to_string();
        if model_id.is_empty() {
            return Err(DomainError::EmptyModelId);
        }
        if timeout.is_zero() {
            return Err(DomainError::ZeroTimeout);
        }
        Ok(Self {
            model_id,
            prompt,
            style,
            timeout,
        })
    }

    /// Build a request from raw user input (model id, prompt text, style name)
    pub fn parse(
        model_id: &str,
        prompt_text: &str,
        style: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let prompt = Prompt::new(prompt_text)?;
        let style = ResponseStyle::parse_optional(style)?;
        Self::new(model_id, prompt, style, timeout)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn style(&self) -> Option<ResponseStyle> {
        self.style
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Prompt text with the style instruction appended
    pub fn composed_prompt(&self) -> String {
        self.prompt.compose(self.style)
    }
}
