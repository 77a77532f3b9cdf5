//! Retrieval-generation pipeline.
//!
//! [`QueryEngine`] answers a question in two stages: retrieve (embed the
//! query, fetch a similarity pool, drop below-threshold candidates,
//! MMR-select up to `top_k`) and generate (join the surviving chunk texts
//! into a context block, render the fixed prompt, complete it at
//! temperature 0). `retrieve` is public on its own so a caller can show
//! exactly the chunks that informed the answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use semantic_spotter::{QueryEngine, SpotterConfig};
//!
//! let engine = QueryEngine::builder()
//!     .config(SpotterConfig::default())
//!     .embedder(embedder)
//!     .index(Arc::new(index))
//!     .generator(generator)
//!     .build()?;
//!
//! let answer = engine.answer("What is covered for disability?").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SpotterConfig;
use crate::document::{Answer, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SpotterError};
use crate::generation::Generator;
use crate::index::VectorIndex;
use crate::prompt;
use crate::reranker::{MmrReranker, Reranker};

/// Answer text returned when retrieval produces no chunks.
///
/// An empty index, or a query where nothing clears the score threshold,
/// deterministically yields this text with no generator call.
pub const NO_CONTEXT_ANSWER: &str = "No relevant policy text was found for this question.";

/// The retrieval-generation engine for one index.
///
/// Holds the session's single index behind the [`VectorIndex`] seam;
/// construct one per session via [`QueryEngine::builder()`].
pub struct QueryEngine {
    config: SpotterConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
    reranker: Arc<dyn Reranker>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryEngine {
    /// Create a new [`QueryEngineBuilder`].
    pub fn builder() -> QueryEngineBuilder {
        QueryEngineBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &SpotterConfig {
        &self.config
    }

    /// Retrieve the chunks most relevant to `query`.
    ///
    /// Fetches a pool of `fetch_multiplier * top_k` candidates by cosine
    /// similarity, drops everything below `score_threshold`, then selects
    /// up to `top_k` results by maximal marginal relevance. The threshold
    /// applies to raw similarity scores, so the diversity pass can only
    /// reorder surviving candidates, never reintroduce filtered ones.
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::Embedding`] if the query cannot be embedded
    /// and [`SpotterError::IndexCorrupt`] on a dimensionality mismatch.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let fetch_k = self.config.top_k.saturating_mul(self.config.fetch_multiplier);
        let pool = self.index.search(&query_embedding, fetch_k).await?;
        let pool_size = pool.len();

        let threshold = self.config.score_threshold;
        let candidates: Vec<SearchResult> =
            pool.into_iter().filter(|r| r.score >= threshold).collect();
        debug!(pool_size, surviving = candidates.len(), threshold, "filtered candidate pool");

        let results =
            self.reranker.rerank(&query_embedding, candidates, self.config.top_k).await?;

        info!(result_count = results.len(), "retrieval completed");
        Ok(results)
    }

    /// Answer `query` from the index, returning the generated text and the
    /// chunks that grounded it.
    ///
    /// The cited chunks are exactly the [`retrieve`](QueryEngine::retrieve)
    /// results whose text was concatenated (blank-line separated, ranked
    /// order) into the prompt context. When retrieval returns nothing the
    /// generator is not called and the answer is [`NO_CONTEXT_ANSWER`] with
    /// no citations.
    ///
    /// # Errors
    ///
    /// Propagates retrieval errors, plus [`SpotterError::Generation`] if
    /// the completion call fails.
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let results = self.retrieve(query).await?;

        if results.is_empty() {
            info!("no chunks cleared the threshold; returning the no-context answer");
            return Ok(Answer { text: NO_CONTEXT_ANSWER.to_string(), cited_chunks: Vec::new() });
        }

        let context =
            results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n");
        let filled = prompt::render(&context, query);

        let text = self.generator.complete(&filled).await?;
        info!(
            model = self.generator.name(),
            cited = results.len(),
            answer_len = text.len(),
            "answer generated"
        );

        Ok(Answer { text, cited_chunks: results.into_iter().map(|r| r.chunk).collect() })
    }
}

/// Builder for constructing a [`QueryEngine`].
///
/// `config`, `embedder`, `index`, and `generator` are required; the
/// reranker defaults to [`MmrReranker`] with the config's `mmr_lambda`.
#[derive(Default)]
pub struct QueryEngineBuilder {
    config: Option<SpotterConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn Generator>>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl QueryEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: SpotterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider (must match the one the index was built with).
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the index to retrieve from.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the generation provider.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override the default MMR reranker.
    pub fn reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Build the [`QueryEngine`], validating that all required parts are set.
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::Configuration`] if a required field is missing.
    pub fn build(self) -> Result<QueryEngine> {
        let config = self
            .config
            .ok_or_else(|| SpotterError::Configuration("config is required".into()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| SpotterError::Configuration("embedder is required".into()))?;
        let index =
            self.index.ok_or_else(|| SpotterError::Configuration("index is required".into()))?;
        let generator = self
            .generator
            .ok_or_else(|| SpotterError::Configuration("generator is required".into()))?;
        let reranker = self
            .reranker
            .unwrap_or_else(|| Arc::new(MmrReranker::new(config.mmr_lambda)));

        Ok(QueryEngine { config, embedder, index, generator, reranker })
    }
}
