//! Retrieval-augmented response pipeline for the UMUHUZA platform assistant.
//!
//! A chat request flows through three stages, all synchronous except the
//! final provider call:
//!
//! ```text
//! query ──► retrieve (hash embed + cosine scan over the knowledge store)
//!       ──► assemble (system prompt + trimmed history + snippets + user turn)
//!       ──► complete (chat backend; typed errors)
//! ```
//!
//! The offline counterpart is the seeding pipeline in [`seed`], which
//! flattens a nested knowledge document into deduplicated chunks and writes
//! them, with their embeddings, into the store the retriever reads.

pub mod assistant;
pub mod context;
pub mod error;
pub mod seed;

pub use assistant::{Assistant, FALLBACK_REPLY};
pub use context::{
    ConversationTurn, DEFAULT_HISTORY_WINDOW, KNOWLEDGE_LABEL, SYSTEM_PROMPT, TurnRole,
    build_messages,
};
pub use error::{AssistantError, Result};
pub use seed::{ExclusionFilter, extract_chunks, seed_knowledge_base};
