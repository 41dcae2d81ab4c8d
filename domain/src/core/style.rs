//! Response style modifier

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// How long an answer the user wants.
///
/// Drawn from a fixed set, so the instruction it appends to a prompt never
/// carries user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    Concise,
    #[serde(alias = "detail")]
    Detailed,
}

impl ResponseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStyle::Concise => "concise",
            ResponseStyle::Detailed => "detailed",
        }
    }

    /// Sentence appended to the prompt for this style
    pub fn instruction(&self) -> &'static str {
        match self {
            ResponseStyle::Concise => "Give a concise answer.",
            ResponseStyle::Detailed => "Give a detailed answer.",
        }
    }

    /// Parse an optional style, treating blank input as "no style"
    pub fn parse_optional(s: Option<&str>) -> Result<Option<Self>, DomainError> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl std::fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResponseStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" => Ok(ResponseStyle::Concise),
            "detailed" | "detail" => Ok(ResponseStyle::Detailed),
            _ => Err(DomainError::UnknownStyle(s.to_string())),
        }
    }
}
