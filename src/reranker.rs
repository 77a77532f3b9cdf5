//! Diversity-aware re-ranking of search results.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;
use crate::index::cosine_similarity;

/// A reranker that reorders a candidate pool into the final result list.
///
/// Candidates arrive ordered by raw similarity and already filtered by the
/// score threshold; implementations select and order at most `top_k` of
/// them.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank candidates for the given query embedding.
    async fn rerank(
        &self,
        query_embedding: &[f32],
        candidates: Vec<SearchResult>,
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// A pass-through reranker that keeps raw similarity order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReranker;

#[async_trait]
impl Reranker for NoOpReranker {
    async fn rerank(
        &self,
        _query_embedding: &[f32],
        mut candidates: Vec<SearchResult>,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        candidates.truncate(top_k);
        Ok(candidates)
    }
}

/// Maximal-marginal-relevance selection.
///
/// Greedily picks the candidate maximizing
/// `lambda * relevance - (1 - lambda) * max_similarity_to_selected`, so the
/// result set balances relevance to the query against redundancy among the
/// results themselves. `lambda = 1.0` degenerates to plain similarity
/// ranking, `lambda = 0.0` to pure diversity. Each result keeps its
/// original similarity score; MMR only determines selection and order.
#[derive(Debug, Clone, Copy)]
pub struct MmrReranker {
    lambda: f32,
}

impl MmrReranker {
    /// Create a reranker with the given relevance/diversity trade-off.
    pub fn new(lambda: f32) -> Self {
        Self { lambda: lambda.clamp(0.0, 1.0) }
    }
}

#[async_trait]
impl Reranker for MmrReranker {
    async fn rerank(
        &self,
        _query_embedding: &[f32],
        mut candidates: Vec<SearchResult>,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut selected: Vec<SearchResult> = Vec::with_capacity(top_k.min(candidates.len()));

        while selected.len() < top_k && !candidates.is_empty() {
            let mut best_idx = 0;
            let mut best_score = f32::NEG_INFINITY;

            for (i, candidate) in candidates.iter().enumerate() {
                let redundancy = selected
                    .iter()
                    .map(|s| cosine_similarity(&candidate.chunk.embedding, &s.chunk.embedding))
                    .fold(0.0f32, f32::max);
                let mmr = self.lambda * candidate.score - (1.0 - self.lambda) * redundancy;
                if mmr > best_score {
                    best_score = mmr;
                    best_idx = i;
                }
            }

            // `remove` keeps the pool in similarity order, so exact MMR
            // ties fall back to relevance rank.
            selected.push(candidates.remove(best_idx));
        }

        Ok(selected)
    }
}
