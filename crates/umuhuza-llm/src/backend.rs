//! The chat backend trait and a scripted mock for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ChatError, Result};
use crate::types::CompletionRequest;

/// Trait for chat-completion providers.
///
/// Implementations send an assembled conversation to a provider and return
/// the first completion choice's text, translating every provider failure
/// into a typed [`ChatError`].
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Complete a conversation and return the reply text (trimmed).
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Name of this backend (for logging).
    fn name(&self) -> &str;
}

/// A shared backend handle, injected into the assistant at construction time.
pub type SharedBackend = Arc<dyn ChatBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Scripted backend for tests.
///
/// Pops one scripted outcome per `complete` call and records every request
/// for later inspection. An exhausted script yields an `Unavailable` error.
#[derive(Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockBackend {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(reply.into()));
    }

    /// Queue an error outcome.
    pub fn push_error(&self, error: ChatError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Requests seen so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Unavailable("mock script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
