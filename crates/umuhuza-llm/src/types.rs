//! Message and request types shared across chat backends.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction (persona, retrieved knowledge).
    System,
    /// End-user turn.
    User,
    /// Model turn.
    Assistant,
}

/// A single role-tagged message in an assembled conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion Request
// ─────────────────────────────────────────────────────────────────────────────

/// A request for a single best completion of a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model identifier at the provider.
    pub model: String,
    /// Ordered message sequence; never mutated after assembly.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Cap on response tokens.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with the given model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: crate::DEFAULT_TEMPERATURE,
            max_tokens: crate::DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the response token cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
