//! Error types for the assistant pipeline.

use thiserror::Error;
use umuhuza_llm::ChatError;

/// Errors surfaced by the assistant's generation pipeline.
///
/// Backend errors pass through unmodified so the web layer can map
/// `MissingApiKey`/`RateLimited`/`Unavailable` to 503/429/500. Retrieval
/// problems never appear here: a degraded knowledge base degrades context,
/// not the request.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The user message was empty or whitespace-only. Callers normally
    /// reject this before invoking the core; the guard stays anyway.
    #[error("User message is empty.")]
    EmptyMessage,

    /// A typed provider error, passed through from the chat backend.
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
