//! Wire types for the Ollama HTTP API.
//!
//! Only the fields this adapter reads are modelled; everything else in the
//! backend's replies is ignored.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | list      | `GET /api/tags` |
//! | chat      | `POST /api/chat` (`stream: false`) |
//! | health    | `GET /api/version` |

use serde::{Deserialize, Serialize};

pub const TAGS_PATH: &str = "/api/tags";
pub const CHAT_PATH: &str = "/api/chat";
pub const VERSION_PATH: &str = "/api/version";

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message>,
    pub stream: bool,
}

impl<'a> ChatRequest<'a> {
    /// Single-turn, non-streaming request
    pub fn single_turn(model: &'a str, prompt: &str) -> Self {
        Self {
            model,
            messages: vec![Message::user(prompt)],
            stream: false,
        }
    }
}

/// Reply of `POST /api/chat`.
///
/// Ollama may answer 200 with an `error` field instead of a message when the
/// model fails mid-run.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: Option<Message>,
    pub error: Option<String>,
}

/// Reply of `GET /api/tags`
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

/// Reply of `GET /api/version`
#[derive(Debug, Clone, Deserialize)]
pub struct VersionResponse {
    pub version: Option<String>,
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
