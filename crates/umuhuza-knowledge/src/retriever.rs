//! Cosine-similarity retrieval over the knowledge store.
//!
//! Retrieval is a brute-force O(N·D) scan: encode the query, score every
//! stored embedding, sort, take the top K. That is the right trade-off for a
//! curated FAQ-scale corpus (tens to low thousands of snippets). If the corpus
//! ever grows past that, an approximate-nearest-neighbor index slots in behind
//! [`retrieve`] without changing callers.

use tracing::{debug, warn};
use umuhuza_embeddings::HashEmbedder;

use crate::error::Result;
use crate::store::KnowledgeStore;

/// Default number of snippets returned per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieve up to `top_k` snippet contents ranked by similarity to `query`.
///
/// An empty or whitespace-only query returns an empty list without touching
/// the store. Pairs where either vector has a zero norm are skipped (the
/// similarity would be undefined), as are stored vectors whose dimension does
/// not match the query's. The sort is stable and descending: ties keep their
/// insertion order.
pub fn retrieve(
    store: &KnowledgeStore,
    embedder: &HashEmbedder,
    query: &str,
    top_k: usize,
) -> Result<Vec<String>> {
    let query = query.trim();
    if query.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }

    let query_vector = embedder.embed(query);
    let query_norm = l2_norm(&query_vector);

    let mut scored: Vec<(String, f32)> = Vec::new();
    for (content, embedding) in store.fetch_all()? {
        if embedding.is_empty() {
            continue;
        }
        if embedding.len() != query_vector.len() {
            warn!(
                "Skipping knowledge row with dimension {} (query dimension {})",
                embedding.len(),
                query_vector.len()
            );
            continue;
        }

        let denominator = query_norm * l2_norm(&embedding);
        if denominator == 0.0 {
            continue;
        }

        let dot: f32 = query_vector
            .iter()
            .zip(embedding.iter())
            .map(|(a, b)| a * b)
            .sum();
        scored.push((content, dot / denominator));
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    debug!(
        "Retrieved {} of {} scored snippets for query ({} chars)",
        top_k.min(scored.len()),
        scored.len(),
        query.len()
    );

    Ok(scored
        .into_iter()
        .take(top_k)
        .map(|(content, _)| content)
        .collect())
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store(embedder: &HashEmbedder, snippets: &[&str]) -> KnowledgeStore {
        let store = KnowledgeStore::open_in_memory().unwrap();
        for snippet in snippets {
            store.insert(snippet, &embedder.embed(snippet)).unwrap();
        }
        store
    }

    #[test]
    fn test_ranking_prefers_shared_vocabulary() {
        let embedder = HashEmbedder::new(256);
        let store = seeded_store(
            &embedder,
            &[
                "apple harvest season",
                "irrigation drip systems",
                "weather alerts for farmers",
            ],
        );

        let results =
            retrieve(&store, &embedder, "when do I plant irrigation equipment", 3).unwrap();
        assert_eq!(results[0], "irrigation drip systems");
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let embedder = HashEmbedder::new(64);
        let store = seeded_store(&embedder, &["some snippet"]);

        assert!(retrieve(&store, &embedder, "", 3).unwrap().is_empty());
        assert!(retrieve(&store, &embedder, "   \t", 3).unwrap().is_empty());
    }

    #[test]
    fn test_empty_store_returns_nothing() {
        let embedder = HashEmbedder::new(64);
        let store = KnowledgeStore::open_in_memory().unwrap();

        assert!(retrieve(&store, &embedder, "anything", 3).unwrap().is_empty());
    }

    #[test]
    fn test_top_k_bound() {
        let embedder = HashEmbedder::new(64);
        let store = seeded_store(&embedder, &["irrigation basics"]);

        let results = retrieve(&store, &embedder, "irrigation", 3).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_top_k_limits_results() {
        let embedder = HashEmbedder::new(256);
        let store = seeded_store(
            &embedder,
            &[
                "maize prices today",
                "maize planting calendar",
                "maize pest control",
                "maize storage tips",
            ],
        );

        let results = retrieve(&store, &embedder, "maize", 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_orthogonal_snippets_still_rank() {
        // No shared tokens: similarity is zero but the pair is valid, so the
        // snippet is still eligible when nothing better exists.
        let embedder = HashEmbedder::new(4096);
        let store = seeded_store(&embedder, &["apple harvest season"]);

        let results = retrieve(&store, &embedder, "irrigation", 3).unwrap();
        assert_eq!(results, vec!["apple harvest season".to_string()]);
    }

    #[test]
    fn test_zero_norm_query_matches_nothing() {
        let embedder = HashEmbedder::new(64);
        let store = seeded_store(&embedder, &["irrigation basics"]);

        // Punctuation only: the query vector is all zeros, every denominator
        // is zero, and no pair qualifies.
        let results = retrieve(&store, &embedder, "?!", 3).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_mismatched_dimension_rows_are_skipped() {
        let embedder = HashEmbedder::new(64);
        let store = KnowledgeStore::open_in_memory().unwrap();

        let other_dim = HashEmbedder::new(32);
        store
            .insert("wrong dimension", &other_dim.embed("irrigation"))
            .unwrap();
        store
            .insert("right dimension", &embedder.embed("irrigation"))
            .unwrap();

        let results = retrieve(&store, &embedder, "irrigation", 3).unwrap();
        assert_eq!(results, vec!["right dimension".to_string()]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let embedder = HashEmbedder::new(256);
        // Identical content embeds identically, so the scores tie exactly.
        let store = KnowledgeStore::open_in_memory().unwrap();
        let vector = embedder.embed("irrigation");
        store.insert("first copy", &vector).unwrap();
        store.insert("second copy", &vector).unwrap();

        let results = retrieve(&store, &embedder, "irrigation", 2).unwrap();
        assert_eq!(
            results,
            vec!["first copy".to_string(), "second copy".to_string()]
        );
    }
}
