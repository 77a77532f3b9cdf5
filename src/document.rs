//! Data types for extracted pages, chunks, and answers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The extracted text of a single PDF page.
///
/// This is the unit fed to the chunker: pages are chunked independently so
/// that every chunk stays traceable to one `(source_path, page_number)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    /// Path of the PDF file this page came from.
    pub source_path: PathBuf,
    /// 1-based page number within the file.
    pub page_number: u32,
    /// The extracted text content of the page.
    pub text: String,
}

/// A bounded span of page text with its vector embedding and source location.
///
/// Immutable once embedded. The `id` is deterministic
/// (`{file_stem}_p{page_number}_{chunk_index}`) so persisted indexes and
/// citations are reproducible across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
    /// Path of the originating PDF file.
    pub source_path: String,
    /// 1-based page number the chunk was extracted from.
    pub page_number: u32,
    /// 0-based index of the chunk within its page.
    pub chunk_index: usize,
}

/// A retrieved [`Chunk`] paired with its relevance score.
///
/// Scores are cosine similarities against the query embedding; higher is
/// more relevant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A generated answer together with the chunks that grounded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The raw text produced by the generation provider.
    pub text: String,
    /// The retrieved chunks whose text formed the prompt context, in
    /// ranked order. At most `top_k` entries; empty when nothing cleared
    /// the similarity threshold.
    pub cited_chunks: Vec<Chunk>,
}
