//! Chunk retrieval over session-owned embeddings
//!
//! Ranks a session's document chunks against a query embedding. When
//! nothing clears the similarity threshold the first chunks are returned
//! instead, so a question always has some context to work with.

use crate::embeddings::cosine_similarity;
use docsage_common::session::DocumentChunk;

/// A chunk with its relevance score for one query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub index: usize,
    pub content: String,
    pub score: f32,
}

/// Number of chunks returned when no chunk clears the threshold
const FALLBACK_CHUNKS: usize = 2;

/// Rank embeddings against a query, best first.
///
/// Returns `(index, score)` pairs for items scoring at least `min_score`,
/// at most `top_k` of them.
pub fn rank_embeddings(
    query: &[f32],
    embeddings: &[Vec<f32>],
    top_k: usize,
    min_score: f32,
) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = embeddings
        .iter()
        .enumerate()
        .filter_map(|(index, embedding)| {
            cosine_similarity(query, embedding).map(|score| (index, score))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .filter(|(_, score)| *score >= min_score)
        .take(top_k)
        .collect()
}

/// Select the chunks most relevant to a query embedding.
pub fn rank_chunks(
    query: &[f32],
    chunks: &[DocumentChunk],
    top_k: usize,
    min_score: f32,
) -> Vec<ScoredChunk> {
    let embeddings: Vec<Vec<f32>> = chunks.iter().map(|c| c.embedding.clone()).collect();
    let ranked = rank_embeddings(query, &embeddings, top_k, min_score);

    if !ranked.is_empty() {
        return ranked
            .into_iter()
            .map(|(index, score)| ScoredChunk {
                index: chunks[index].index,
                content: chunks[index].content.clone(),
                score,
            })
            .collect();
    }

    // Similarity was uninformative; fall back to document order
    chunks
        .iter()
        .take(FALLBACK_CHUNKS)
        .map(|chunk| ScoredChunk {
            index: chunk.index,
            content: chunk.content.clone(),
            score: 0.0,
        })
        .collect()
}
