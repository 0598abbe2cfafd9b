//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [llm]          # provider model and sampling
//! [embedding]    # hashing-trick dimension
//! [knowledge]    # database path, knowledge document, exclusion terms
//! [retrieval]    # top-k and history window
//! ```
//!
//! Every section and field has a default, so an absent or empty file is a
//! fully working configuration. Secrets (the API key) are never read from
//! the file; they come from the environment only.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UmuhuzaConfig {
    /// LLM provider configuration.
    pub llm: LlmSettings,

    /// Embedding encoder configuration.
    pub embedding: EmbeddingSettings,

    /// Knowledge store and seeding configuration.
    pub knowledge: KnowledgeSettings,

    /// Retrieval and conversation-window configuration.
    pub retrieval: RetrievalSettings,
}

impl UmuhuzaConfig {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// LLM provider settings. Defaults mirror the provider crate's constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API key; environment-only (`GROQ_API_KEY`), never persisted to disk.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Model identifier at the provider.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Cap on response tokens.
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.4,
            max_tokens: 600,
        }
    }
}

/// Embedding encoder settings.
///
/// The dimension used to seed the knowledge base and the dimension used to
/// encode queries must match; keep this value stable once a store is seeded,
/// or re-seed after changing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Vector dimension for the hashing-trick encoder.
    pub dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { dim: 4096 }
    }
}

/// Knowledge store and seeding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    /// Path to the SQLite knowledge store.
    pub db_path: PathBuf,

    /// Path to the source knowledge document (nested JSON) for seeding.
    pub document_path: PathBuf,

    /// Case-insensitive substrings; chunks containing any of them are
    /// excluded at seed time.
    pub excluded_terms: Vec<String>,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("umuhuza.db"),
            document_path: PathBuf::from("chatbot_knowledge_base.json"),
            excluded_terms: vec!["ikiraro".to_string()],
        }
    }
}

/// Retrieval and conversation-window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of knowledge snippets injected per query.
    pub top_k: usize,

    /// Trailing window of history turns kept in the assembled conversation.
    pub history_window: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            history_window: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UmuhuzaConfig::default();
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.temperature, 0.4);
        assert_eq!(config.llm.max_tokens, 600);
        assert_eq!(config.embedding.dim, 4096);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.history_window, 6);
        assert_eq!(config.knowledge.excluded_terms, vec!["ikiraro"]);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config = UmuhuzaConfig::from_toml("").unwrap();
        assert_eq!(config, UmuhuzaConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = UmuhuzaConfig::from_toml(
            r#"
            [embedding]
            dim = 512

            [retrieval]
            top_k = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.embedding.dim, 512);
        assert_eq!(config.retrieval.top_k, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.retrieval.history_window, 6);
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_api_key_never_parsed_from_file() {
        let config = UmuhuzaConfig::from_toml(
            r#"
            [llm]
            model = "other-model"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "other-model");
        assert!(config.llm.api_key.is_none());
    }
}
