//! Knowledge base storage and retrieval for the UMUHUZA assistant.
//!
//! This crate owns the persisted side of retrieval-augmented generation:
//!
//! - [`KnowledgeStore`]: a SQLite table of `(content, embedding)` pairs,
//!   written in bulk by the seeding pipeline and read-only at query time.
//! - [`retrieve`]: a cosine-similarity scan that returns the top-K snippet
//!   contents for a query string.
//!
//! Embeddings are stored as JSON arrays of floats. Rows that fail to parse
//! are skipped with a warning; retrieval is best-effort over whatever valid
//! rows exist.

pub mod error;
pub mod retriever;
pub mod store;

pub use error::{KnowledgeError, Result};
pub use retriever::{DEFAULT_TOP_K, retrieve};
pub use store::KnowledgeStore;
