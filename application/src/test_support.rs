//! In-memory backend used by the unit tests of this crate.

use crate::ports::model_backend::{BackendError, BackendHealth, ModelBackend};
use async_trait::async_trait;
use llmgate_domain::Model;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Scripted chat behaviour
#[derive(Debug, Clone)]
pub enum ChatReply {
    Text(String),
    Fail(BackendError),
    /// Reply after a delay, ignoring the deadline (a backend that cannot be
    /// cancelled server-side)
    Slow(Duration, String),
}

pub struct FakeBackend {
    listing: Mutex<Result<Vec<Model>, BackendError>>,
    list_delay: Mutex<Duration>,
    reply: Mutex<ChatReply>,
    pub list_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    /// Chat calls that ran to completion (not dropped mid-flight)
    pub chat_finished: AtomicUsize,
    pub last_chat: Mutex<Option<(String, String)>>,
}

impl FakeBackend {
    pub fn with_models(ids: &[&str]) -> Self {
        Self {
            listing: Mutex::new(Ok(models(ids))),
            list_delay: Mutex::new(Duration::ZERO),
            reply: Mutex::new(ChatReply::Text("ok".to_string())),
            list_calls: AtomicUsize::new(0),
            chat_calls: AtomicUsize::new(0),
            chat_finished: AtomicUsize::new(0),
            last_chat: Mutex::new(None),
        }
    }

    pub fn failing(error: BackendError) -> Self {
        let backend = Self::with_models(&[]);
        backend.set_listing(Err(error));
        backend
    }

    pub fn set_listing(&self, listing: Result<Vec<Model>, BackendError>) {
        *self.listing.lock().unwrap() = listing;
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = delay;
    }

    pub fn set_reply(&self, reply: ChatReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn chat_finished(&self) -> usize {
        self.chat_finished.load(Ordering::SeqCst)
    }

    pub fn last_chat(&self) -> Option<(String, String)> {
        self.last_chat.lock().unwrap().clone()
    }
}

pub fn models(ids: &[&str]) -> Vec<Model> {
    ids.iter().map(|id| id.parse().unwrap()).collect()
}

#[async_trait]
impl ModelBackend for FakeBackend {
    async fn list_models(&self) -> Result<Vec<Model>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.listing.lock().unwrap().clone()
    }

    async fn chat_completion(
        &self,
        model: &Model,
        prompt: &str,
        _deadline: Instant,
    ) -> Result<String, BackendError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_chat.lock().unwrap() = Some((model.to_string(), prompt.to_string()));
        let reply = self.reply.lock().unwrap().clone();
        let result = match reply {
            ChatReply::Text(text) => Ok(text),
            ChatReply::Fail(error) => Err(error),
            ChatReply::Slow(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        };
        self.chat_finished.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn health(&self) -> Result<BackendHealth, BackendError> {
        Ok(BackendHealth {
            endpoint: "fake://".to_string(),
            version: Some("0.0.0".to_string()),
        })
    }
}
