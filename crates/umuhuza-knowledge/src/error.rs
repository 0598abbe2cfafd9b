//! Error types for the knowledge crate.

use thiserror::Error;

/// Errors that can occur in the knowledge crate.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Database connection or operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid path or filesystem state.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Result type alias for knowledge operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;
