//! Brute-force cosine-similarity ranking.
//!
//! A linear scan over every stored chunk, acceptable for the small corpora
//! this backend serves. Two edges the source left undefined are pinned down
//! here: zero-norm vectors are excluded from ranking entirely, and a
//! dimensionality mismatch between query and stored vectors is a validation
//! error rather than a silent wrong answer.

use crate::types::ChunkRecord;
use tutor_core::{AppError, AppResult};

/// Cosine similarity between two vectors.
///
/// Returns `None` when either vector has zero norm (the ratio would not be
/// finite) or when the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some(dot / (norm_a * norm_b))
}

/// Rank chunks by cosine similarity to the query embedding and return the
/// texts of the `top_k` best matches, highest first.
///
/// Equal scores keep insertion order (the sort is stable). An empty input
/// yields an empty result; a stored vector whose dimensionality differs from
/// the query is a validation error.
pub fn rank(
    query_embedding: &[f32],
    chunks: &[ChunkRecord],
    top_k: usize,
) -> AppResult<Vec<String>> {
    for chunk in chunks {
        if chunk.embedding.len() != query_embedding.len() {
            return Err(AppError::Knowledge(format!(
                "Embedding dimension mismatch: query has {} dimensions, chunk {} has {}",
                query_embedding.len(),
                chunk.id,
                chunk.embedding.len()
            )));
        }
    }

    let mut scored: Vec<(&ChunkRecord, f32)> = chunks
        .iter()
        .filter_map(|chunk| {
            cosine_similarity(query_embedding, &chunk.embedding).map(|score| (chunk, score))
        })
        .collect();

    // Stable sort: ties keep insertion (id) order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    tracing::debug!(
        "Ranked {} chunks, returning top {}",
        chunks.len(),
        scored.len()
    );

    Ok(scored
        .into_iter()
        .map(|(chunk, _)| chunk.text.clone())
        .collect())
}
