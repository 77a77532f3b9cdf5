//! # semantic-spotter
//!
//! Retrieval-augmented question answering over a fixed corpus of insurance
//! policy PDFs.
//!
//! ## Overview
//!
//! Three components compose linearly:
//!
//! - [`DocumentLoader`] reads every PDF in a directory, extracts per-page
//!   text, and splits it into overlapping chunks tagged with their source
//!   file and page number.
//! - [`IndexManager`] embeds the chunks through an [`EmbeddingProvider`],
//!   builds a cosine-similarity [`InMemoryIndex`], and persists/reloads it
//!   with fail-fast dimensionality checks.
//! - [`QueryEngine`] embeds a question, retrieves the most relevant chunks
//!   with maximal-marginal-relevance ranking, and asks a [`Generator`] for
//!   an answer grounded in them, returning the cited chunks alongside the
//!   text.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use semantic_spotter::{
//!     DocumentLoader, IndexManager, OpenAiEmbedder, OpenAiGenerator,
//!     QueryEngine, SpotterConfig,
//! };
//!
//! let config = SpotterConfig::default();
//! let loader = DocumentLoader::new(config.chunk_size, config.chunk_overlap)?;
//! let chunks = loader.load_documents("policy_documents".as_ref())?;
//!
//! let embedder = Arc::new(OpenAiEmbedder::new(api_key.clone())?);
//! let manager = IndexManager::new(embedder.clone());
//! let index = manager.create_index(&chunks).await?;
//!
//! let engine = QueryEngine::builder()
//!     .config(config)
//!     .embedder(embedder)
//!     .index(Arc::new(index))
//!     .generator(Arc::new(OpenAiGenerator::new(api_key)?))
//!     .build()?;
//!
//! let answer = engine.answer("What is the coverage for disability?").await?;
//! ```
//!
//! Credentials are passed in explicitly everywhere; only a binary entry
//! point should read the process environment.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod reranker;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{SpotterConfig, SpotterConfigBuilder};
pub use document::{Answer, Chunk, PageText, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{Result, SpotterError};
pub use generation::Generator;
pub use index::{IndexManager, InMemoryIndex, VectorIndex};
pub use loader::DocumentLoader;
pub use openai::{OpenAiEmbedder, OpenAiGenerator};
pub use pipeline::{NO_CONTEXT_ANSWER, QueryEngine, QueryEngineBuilder};
pub use reranker::{MmrReranker, NoOpReranker, Reranker};
