//! Configuration for loading, retrieval, and ranking.

use crate::error::{Result, SpotterError};

/// Configuration parameters for the spotter pipeline.
///
/// Chunk sizes are measured in characters. `fetch_multiplier` and
/// `mmr_lambda` control the diversity re-ranking: the retriever fetches a
/// candidate pool of `fetch_multiplier * top_k` chunks by raw similarity,
/// drops everything below `score_threshold`, then selects up to `top_k`
/// results by maximal marginal relevance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotterConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks of a page.
    pub chunk_overlap: usize,
    /// Maximum number of chunks returned per query.
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to be considered at all.
    pub score_threshold: f32,
    /// Candidate pool size as a multiple of `top_k`.
    pub fetch_multiplier: usize,
    /// Relevance/diversity trade-off for MMR selection, in `[0, 1]`.
    /// 1.0 is pure relevance, 0.0 is pure diversity.
    pub mmr_lambda: f32,
}

impl Default for SpotterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 50,
            score_threshold: 0.8,
            fetch_multiplier: 4,
            mmr_lambda: 0.5,
        }
    }
}

impl SpotterConfig {
    /// Create a new builder for constructing a [`SpotterConfig`].
    pub fn builder() -> SpotterConfigBuilder {
        SpotterConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`SpotterConfig`].
#[derive(Debug, Clone, Default)]
pub struct SpotterConfigBuilder {
    config: SpotterConfig,
}

impl SpotterConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the maximum number of chunks returned per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the minimum similarity threshold for retrieval.
    pub fn score_threshold(mut self, threshold: f32) -> Self {
        self.config.score_threshold = threshold;
        self
    }

    /// Set the candidate pool size as a multiple of `top_k`.
    pub fn fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.config.fetch_multiplier = multiplier;
        self
    }

    /// Set the MMR relevance/diversity trade-off.
    pub fn mmr_lambda(mut self, lambda: f32) -> Self {
        self.config.mmr_lambda = lambda;
        self
    }

    /// Build the [`SpotterConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::Configuration`] if:
    /// - `chunk_size == 0` or `chunk_overlap >= chunk_size`
    /// - `top_k == 0` or `fetch_multiplier == 0`
    /// - `score_threshold` is not in `[0, 1]`
    /// - `mmr_lambda` is not in `[0, 1]`
    pub fn build(self) -> Result<SpotterConfig> {
        let c = &self.config;
        if c.chunk_size == 0 {
            return Err(SpotterError::Configuration("chunk_size must be greater than zero".into()));
        }
        if c.chunk_overlap >= c.chunk_size {
            return Err(SpotterError::Configuration(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                c.chunk_overlap, c.chunk_size
            )));
        }
        if c.top_k == 0 {
            return Err(SpotterError::Configuration("top_k must be greater than zero".into()));
        }
        if c.fetch_multiplier == 0 {
            return Err(SpotterError::Configuration(
                "fetch_multiplier must be greater than zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&c.score_threshold) {
            return Err(SpotterError::Configuration(format!(
                "score_threshold ({}) must be within [0, 1]",
                c.score_threshold
            )));
        }
        if !(0.0..=1.0).contains(&c.mmr_lambda) {
            return Err(SpotterError::Configuration(format!(
                "mmr_lambda ({}) must be within [0, 1]",
                c.mmr_lambda
            )));
        }
        Ok(self.config)
    }
}
