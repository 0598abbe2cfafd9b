//! Chat-completion client for the UMUHUZA assistant.
//!
//! The core abstraction is the [`ChatBackend`] trait: send an assembled
//! conversation, get back the first completion choice's text. The production
//! implementation is [`GroqBackend`] (OpenAI-compatible wire format); tests
//! use [`MockBackend`].
//!
//! Every failure is one of three typed errors ([`ChatError::MissingApiKey`],
//! [`ChatError::RateLimited`], [`ChatError::Unavailable`]) so the web layer
//! can map them to 503, 429, and 500 without inspecting strings.

pub mod backend;
pub mod error;
pub mod groq;
pub mod types;

pub use backend::{ChatBackend, MockBackend, SharedBackend};
pub use error::{ChatError, Result, classify_provider_error};
pub use groq::{GroqBackend, GroqConfig};
pub use types::{ChatMessage, CompletionRequest, Role};

/// Default model identifier: a small, fast instruction-tuned model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default cap on response tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 600;
