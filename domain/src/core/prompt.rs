//! Prompt value object

use super::error::DomainError;
use super::style::ResponseStyle;
use serde::{Deserialize, Serialize};

/// User-supplied prompt text (Value Object)
///
/// Guaranteed to contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt {
    content: String,
}

impl Prompt {
    /// Create a new prompt, rejecting empty or whitespace-only text
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyPrompt)
        } else {
            Ok(Self { content })
        }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Append the style instruction, if any, to the prompt text.
    ///
    /// Plain concatenation: the instruction follows the prompt as a new
    /// sentence. A prompt already ending in `.`, `?` or `!` is separated by a
    /// single space, anything else gets `". "`.
    pub fn compose(&self, style: Option<ResponseStyle>) -> String {
        let Some(style) = style else {
            return self.content.clone();
        };

        let body = self.content.trim_end();
        let separator = if body.ends_with(['.', '?', '!']) {
            " "
        } else {
            ". "
        };
        format!("{}{}{}", body, separator, style.instruction())
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Prompt {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Prompt::new(s)
    }
}

impl From<Prompt> for String {
    fn from(p: Prompt) -> Self {
        p.content
    }
}
