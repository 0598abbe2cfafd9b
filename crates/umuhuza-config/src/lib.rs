//! Configuration loading for the UMUHUZA assistant.
//!
//! Configuration is resolved in two layers:
//!
//! 1. An optional `umuhuza.toml` file (all sections optional, see
//!    [`UmuhuzaConfig`]).
//! 2. Environment variables, which override the file:
//!    - `GROQ_API_KEY`: provider credential (environment-only)
//!    - `GROQ_MODEL`: model identifier
//!    - `GROQ_TEMPERATURE`: sampling temperature
//!    - `KNOWLEDGE_EMBED_DIM`: embedding dimension
//!    - `UMUHUZA_DB_PATH`: knowledge store path
//!    - `UMUHUZA_KNOWLEDGE_FILE`: seeding document path
//!
//! Unparseable numeric values are ignored with a warning rather than
//! failing startup; the previous (file or default) value stays in effect.

pub mod error;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::warn;

pub use error::{ConfigError, Result};
pub use types::{
    EmbeddingSettings, KnowledgeSettings, LlmSettings, RetrievalSettings, UmuhuzaConfig,
};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "umuhuza.toml";

/// Load configuration.
///
/// With an explicit `path`, a missing or unreadable file is an error. With
/// `None`, `umuhuza.toml` is used when present and silently skipped when not.
/// Environment variables are applied on top either way.
pub fn load(path: Option<&Path>) -> Result<UmuhuzaConfig> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default.exists() {
                read_file(&default)?
            } else {
                UmuhuzaConfig::default()
            }
        }
    };

    apply_env(&mut config);
    Ok(config)
}

fn read_file(path: &Path) -> Result<UmuhuzaConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    UmuhuzaConfig::from_toml(&contents)
}

/// Overlay process environment variables onto a config.
pub fn apply_env(config: &mut UmuhuzaConfig) {
    overlay(config, |name| std::env::var(name).ok());
}

/// Overlay environment-style variables from an arbitrary lookup.
///
/// Split out from [`apply_env`] so tests can exercise the overlay rules
/// without mutating process-wide environment state.
fn overlay<F>(config: &mut UmuhuzaConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.is_empty()) {
        config.llm.api_key = Some(key);
    }

    if let Some(model) = lookup("GROQ_MODEL").filter(|m| !m.is_empty()) {
        config.llm.model = model;
    }

    if let Some(raw) = lookup("GROQ_TEMPERATURE") {
        match raw.parse::<f32>() {
            Ok(temperature) => config.llm.temperature = temperature,
            Err(_) => warn!("Ignoring unparseable GROQ_TEMPERATURE: {:?}", raw),
        }
    }

    if let Some(raw) = lookup("KNOWLEDGE_EMBED_DIM") {
        match raw.parse::<usize>() {
            Ok(dim) if dim > 0 => config.embedding.dim = dim,
            _ => warn!("Ignoring invalid KNOWLEDGE_EMBED_DIM: {:?}", raw),
        }
    }

    if let Some(path) = lookup("UMUHUZA_DB_PATH").filter(|p| !p.is_empty()) {
        config.knowledge.db_path = PathBuf::from(path);
    }

    if let Some(path) = lookup("UMUHUZA_KNOWLEDGE_FILE").filter(|p| !p.is_empty()) {
        config.knowledge.document_path = PathBuf::from(path);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
