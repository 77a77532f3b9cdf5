//! Vector index construction, search, and persistence.
//!
//! [`IndexManager`] owns the embedding provider and drives the three index
//! operations: `create_index` (embed every chunk, batched), `save_index`
//! (versioned JSON envelope on disk), and `load_index` (fail-fast checks
//! against the current embedding configuration). [`InMemoryIndex`] is the
//! cosine-similarity index behind the [`VectorIndex`] seam.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::document::{Chunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, SpotterError};

/// File name of the persisted index inside its directory.
const INDEX_FILE: &str = "index.json";

/// On-disk envelope version.
const INDEX_VERSION: u32 = 1;

/// Number of chunk texts sent per embedding request.
const EMBED_BATCH_SIZE: usize = 64;

/// A searchable collection of embedded chunks.
///
/// The index's dimensionality is fixed at creation; every query vector is
/// checked against it.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// The embedding dimensionality this index was built with.
    fn dimensions(&self) -> usize;

    /// Number of chunks in the index.
    fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the `top_k` chunks most similar to `embedding`, ordered by
    /// descending score.
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::IndexCorrupt`] if `embedding` has the wrong
    /// dimensionality.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;
}

/// An in-memory cosine-similarity index over embedded chunks.
///
/// Built whole by [`IndexManager::create_index`] or
/// [`IndexManager::load_index`] and never mutated afterwards, so it can be
/// shared freely behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InMemoryIndex {
    model: String,
    dimensions: usize,
    chunks: Vec<Chunk>,
}

impl InMemoryIndex {
    /// Build an index over chunks that already carry embeddings.
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::IndexCorrupt`] if any chunk's embedding
    /// length differs from `dimensions`.
    pub fn new(model: impl Into<String>, dimensions: usize, chunks: Vec<Chunk>) -> Result<Self> {
        for chunk in &chunks {
            if chunk.embedding.len() != dimensions {
                return Err(SpotterError::IndexCorrupt(format!(
                    "chunk '{}' has embedding dimension {} but the index expects {dimensions}",
                    chunk.id,
                    chunk.embedding.len()
                )));
            }
        }
        Ok(Self { model: model.into(), dimensions, chunks })
    }

    /// The embedding model identifier the index was built with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The indexed chunks, in insertion order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if embedding.len() != self.dimensions {
            return Err(SpotterError::IndexCorrupt(format!(
                "query embedding has dimension {} but the index expects {}",
                embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// The on-disk form of an index: a versioned envelope around the embedded
/// chunks, recording the embedding model and dimensionality they were
/// produced with.
#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    model: String,
    dimensions: usize,
    chunks: Vec<Chunk>,
}

/// Creates, persists, and reloads vector indexes.
///
/// The embedding configuration (model, credential) travels inside the
/// provider, supplied explicitly by the caller.
///
/// # Example
///
/// ```rust,ignore
/// use semantic_spotter::{IndexManager, OpenAiEmbedder};
///
/// let manager = IndexManager::new(Arc::new(OpenAiEmbedder::new(api_key)?));
/// let index = manager.create_index(&chunks).await?;
/// manager.save_index(&index, "policy_index".as_ref()).await?;
/// ```
pub struct IndexManager {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexManager {
    /// Create a manager around the given embedding provider.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// The embedding provider this manager embeds and validates with.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Embed every chunk and build an index over the vectors.
    ///
    /// Texts are embedded in batches of 64. Any provider failure aborts the
    /// whole operation; a partial index is never returned.
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::Embedding`] if any embedding call fails, or
    /// [`SpotterError::IndexCorrupt`] if the provider returns vectors of an
    /// unexpected dimension.
    pub async fn create_index(&self, chunks: &[Chunk]) -> Result<InMemoryIndex> {
        let mut embedded = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
                error!(error = %e, "embedding failed during index creation");
            })?;
            if vectors.len() != batch.len() {
                return Err(SpotterError::Embedding {
                    provider: self.embedder.model().to_string(),
                    message: format!(
                        "provider returned {} embeddings for {} texts",
                        vectors.len(),
                        batch.len()
                    ),
                });
            }
            for (chunk, embedding) in batch.iter().zip(vectors) {
                let mut chunk = chunk.clone();
                chunk.embedding = embedding;
                embedded.push(chunk);
            }
        }

        let index =
            InMemoryIndex::new(self.embedder.model(), self.embedder.dimensions(), embedded)?;
        info!(chunk_count = index.len(), dimensions = index.dimensions(), "created index");
        Ok(index)
    }

    /// Serialize the index to `dir/index.json`.
    ///
    /// Creates parent directories as needed and overwrites any existing
    /// index at that path.
    pub async fn save_index(&self, index: &InMemoryIndex, dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dir).await?;

        let state = PersistedIndex {
            version: INDEX_VERSION,
            model: index.model().to_string(),
            dimensions: index.dimensions(),
            chunks: index.chunks().to_vec(),
        };
        let data = serde_json::to_string_pretty(&state).map_err(|e| {
            SpotterError::IndexCorrupt(format!("failed to serialize index: {e}"))
        })?;

        let path = dir.join(INDEX_FILE);
        tokio::fs::write(&path, data).await?;
        info!(path = %path.display(), chunk_count = index.len(), "saved index");
        Ok(())
    }

    /// Load a previously saved index from `dir`, validating it against the
    /// current embedding configuration.
    ///
    /// # Errors
    ///
    /// - [`SpotterError::NotFound`] if the directory or index file is missing.
    /// - [`SpotterError::IndexCorrupt`] if the file is unreadable, the
    ///   envelope version is unknown, the stored dimensionality disagrees
    ///   with the provider's, or any stored embedding has the wrong length.
    pub async fn load_index(&self, dir: &Path) -> Result<InMemoryIndex> {
        let path = dir.join(INDEX_FILE);
        if !path.is_file() {
            return Err(SpotterError::NotFound { path });
        }

        let data = tokio::fs::read_to_string(&path).await?;
        let state: PersistedIndex = serde_json::from_str(&data).map_err(|e| {
            SpotterError::IndexCorrupt(format!("failed to parse {}: {e}", path.display()))
        })?;

        if state.version != INDEX_VERSION {
            return Err(SpotterError::IndexCorrupt(format!(
                "unsupported index version {} (expected {INDEX_VERSION})",
                state.version
            )));
        }
        let expected = self.embedder.dimensions();
        if state.dimensions != expected {
            return Err(SpotterError::IndexCorrupt(format!(
                "stored index has dimension {} but the embedding provider produces {expected}",
                state.dimensions
            )));
        }
        if state.model != self.embedder.model() {
            warn!(stored = %state.model, current = %self.embedder.model(), "index was built with a different embedding model");
        }

        let index = InMemoryIndex::new(state.model, state.dimensions, state.chunks)?;
        debug!(path = %path.display(), chunk_count = index.len(), "loaded index");
        Ok(index)
    }
}
