//! Offline seeding: flatten a nested knowledge document into deduplicated
//! chunks, encode each, and persist into the knowledge store.
//!
//! Runs once, ahead of serving traffic. Re-running against an already-seeded
//! store duplicates rows; callers wanting a replace call
//! [`KnowledgeStore::clear`] first.

use serde_json::Value;
use tracing::{info, warn};
use umuhuza_embeddings::HashEmbedder;
use umuhuza_knowledge::{KnowledgeStore, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Exclusion Filter
// ─────────────────────────────────────────────────────────────────────────────

/// Case-insensitive substring filter applied to candidate chunks.
///
/// Chunks mentioning any excluded term are dropped at seed time. The default
/// excludes leftover content about an unrelated brand.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    terms: Vec<String>,
}

impl ExclusionFilter {
    /// Build a filter from a list of terms (matched case-insensitively).
    pub fn new(terms: &[String]) -> Self {
        Self {
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// A filter that excludes nothing.
    pub fn none() -> Self {
        Self { terms: Vec::new() }
    }

    /// Whether `text` matches any excluded term.
    pub fn matches(&self, text: &str) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        let lowered = text.to_lowercase();
        self.terms.iter().any(|term| lowered.contains(term))
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(&["ikiraro".to_string()])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chunk Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Flatten a nested JSON document into plain text chunks.
///
/// Object values and array elements are traversed recursively; string leaves
/// are trimmed and kept when non-empty and not excluded. Numbers, booleans,
/// and nulls are ignored.
pub fn extract_chunks(node: &Value, exclude: &ExclusionFilter) -> Vec<String> {
    let mut chunks = Vec::new();
    collect_chunks(node, exclude, &mut chunks);
    chunks
}

fn collect_chunks(node: &Value, exclude: &ExclusionFilter, chunks: &mut Vec<String>) {
    match node {
        Value::String(s) => {
            let cleaned = s.trim();
            if !cleaned.is_empty() && !exclude.matches(cleaned) {
                chunks.push(cleaned.to_string());
            }
        }
        Value::Object(map) => {
            for value in map.values() {
                collect_chunks(value, exclude, chunks);
            }
        }
        Value::Array(values) => {
            for value in values {
                collect_chunks(value, exclude, chunks);
            }
        }
        _ => {}
    }
}

/// Deduplicate chunks preserving first-seen order.
fn dedup_preserving_order(chunks: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    chunks
        .into_iter()
        .filter(|chunk| seen.insert(chunk.clone()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Seeding
// ─────────────────────────────────────────────────────────────────────────────

/// Seed the knowledge store from a nested knowledge document.
///
/// Returns the number of snippets inserted. Zero extracted chunks is a
/// logged no-op, not an error.
pub fn seed_knowledge_base(
    document: &Value,
    store: &KnowledgeStore,
    embedder: &HashEmbedder,
    exclude: &ExclusionFilter,
) -> Result<usize> {
    let chunks = dedup_preserving_order(extract_chunks(document, exclude));

    if chunks.is_empty() {
        warn!("No knowledge snippets found in document; nothing to seed");
        return Ok(0);
    }

    info!(
        "Seeding {} snippets at dimension {}",
        chunks.len(),
        embedder.dim()
    );

    for (index, chunk) in chunks.iter().enumerate() {
        let embedding = embedder.embed(chunk);
        store.insert(chunk, &embedding)?;
        info!("[{}/{}] inserted", index + 1, chunks.len());
    }

    Ok(chunks.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
