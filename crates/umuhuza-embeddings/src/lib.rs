//! Hashing-trick text embeddings for the UMUHUZA assistant.
//!
//! This crate converts text into fixed-dimension vectors without a learned
//! vocabulary or any external service. Each token is hashed with SHA-256,
//! reduced modulo the embedding dimension into a bucket, and counted; the
//! resulting count vector is L2-normalized. Collisions are an accepted
//! property of the scheme, not an error.
//!
//! The same dimension must be used for the knowledge base and for queries.
//! This is an operational invariant: nothing at runtime checks it, but
//! similarity scores are meaningless across dimensions.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Default embedding dimension.
pub const DEFAULT_EMBEDDING_DIM: usize = 4096;

/// Word-token pattern. The regex crate's `\w` is Unicode-aware by default.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").expect("valid token pattern"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Hash Embedder
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic, stateless text encoder.
///
/// The same text and dimension always produce a bit-identical vector, which
/// makes retrieval results reproducible and the encoder trivially testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of length `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// The dimension of vectors produced by this embedder.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Encode `text` into an L2-normalized vector of length `dim`.
    ///
    /// Empty or whitespace-only input (or input with no word tokens) yields
    /// the all-zero vector; normalization never divides by a zero norm.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];

        let lowered = text.to_lowercase();
        let mut has_tokens = false;
        for token in token_pattern().find_iter(&lowered) {
            vector[self.bucket(token.as_str())] += 1.0;
            has_tokens = true;
        }

        if !has_tokens {
            return vector;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        vector
    }

    /// Map a token to a bucket index in `0..dim`.
    ///
    /// The SHA-256 digest is interpreted as a 256-bit big-endian integer and
    /// reduced modulo `dim`, folding the bytes in one at a time so no bigint
    /// arithmetic is needed.
    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut remainder: usize = 0;
        for byte in digest {
            remainder = (remainder * 256 + byte as usize) % self.dim;
        }
        remainder
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Similarity
// ─────────────────────────────────────────────────────────────────────────────

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when the lengths differ or either vector has a zero norm, so
/// callers never see a division by zero or a NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
