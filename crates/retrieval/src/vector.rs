//! Vector similarity utilities for chunk retrieval.

use crate::index::IndexedChunk;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank indexed chunks by cosine similarity to a query embedding.
///
/// Returns `(chunk position, similarity)` pairs sorted by descending
/// similarity, truncated to `top_k`, with everything below `min_score`
/// dropped.
pub fn rank_chunks(
    chunks: &[IndexedChunk],
    query_embedding: &[f32],
    top_k: usize,
    min_score: f32,
) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = chunks
        .iter()
        .enumerate()
        .filter_map(|(i, chunk)| {
            let sim = cosine_similarity(&chunk.embedding, query_embedding);
            (sim >= min_score).then_some((i, sim))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}
