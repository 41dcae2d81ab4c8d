//! Model value object representing an installed LLM

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tag the backend assumes when a model name carries none.
pub const DEFAULT_TAG: &str = "latest";

/// A model installed on the backend (Value Object)
///
/// Only the identifier is mandatory. Identifiers are whatever the backend
/// reports, typically `name:tag` (e.g. `llama3:latest`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Model {
    id: String,
}

impl Model {
    /// Create a model from a backend identifier
    ///
    /// Surrounding whitespace is stripped; an empty identifier is rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyModelId);
        }
        if trimmed.len() == id.len() {
            Ok(Self { id })
        } else {
            Ok(Self {
                id: trimmed.to_string(),
            })
        }
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Name part of the identifier (before the `:tag`)
    pub fn name(&self) -> &str {
        self.id.split_once(':').map_or(&self.id, |(name, _)| name)
    }

    /// Tag part of the identifier, if any
    pub fn tag(&self) -> Option<&str> {
        self.id.split_once(':').map(|(_, tag)| tag)
    }

    /// Check whether a user-supplied identifier refers to this model.
    ///
    /// Exact matches always apply. An untagged identifier also matches the
    /// `:latest` tag of the same name.
    pub fn matches(&self, requested: &str) -> bool {
        if self.id == requested {
            return true;
        }
        !requested.contains(':') && self.tag() == Some(DEFAULT_TAG) && self.name() == requested
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::str::FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Model::new(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Model::new(s).map_err(serde::de::Error::custom)
    }
}
