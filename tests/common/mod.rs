//! Shared test doubles: deterministic embedding and generation providers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use semantic_spotter::{Chunk, EmbeddingProvider, Generator, Result, SpotterError};

/// Vocabulary for [`KeywordEmbedder`]: one dimension per insurance term.
pub const KEYWORDS: [&str; 8] =
    ["disability", "salary", "coverage", "60", "dental", "vision", "premium", "deductible"];

/// Embeds text as keyword occurrence counts, one dimension per entry of
/// [`KEYWORDS`]. Texts sharing vocabulary get high cosine similarity, which
/// makes retrieval outcomes easy to reason about in tests.
pub struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS.iter().map(|k| lower.matches(k).count() as f32).collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORDS.len()
    }

    fn model(&self) -> &str {
        "keyword-mock"
    }
}

/// Deterministic text-dependent embeddings of arbitrary dimension, for
/// index round-trip and dimensionality tests.
pub struct HashEmbedder {
    pub dims: usize,
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; self.dims];
        for (i, b) in text.bytes().enumerate() {
            v[i % self.dims] += f32::from(b) / 255.0;
        }
        if v.iter().all(|x| *x == 0.0) {
            v[0] = 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model(&self) -> &str {
        "hash-mock"
    }
}

/// A generator that answers from the prompt content and counts its calls,
/// so tests can assert both grounding and the no-call short-circuit.
#[derive(Default)]
pub struct MockGenerator {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Generator for MockGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("60%") {
            Ok("The policy pays 60% of salary for disability.".to_string())
        } else {
            Ok("I don't know.".to_string())
        }
    }

    fn name(&self) -> &str {
        "generator-mock"
    }
}

impl MockGenerator {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A generator whose every call fails, for error propagation tests.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(SpotterError::Generation {
            provider: "failing-mock".into(),
            message: "simulated provider outage".into(),
        })
    }

    fn name(&self) -> &str {
        "failing-mock"
    }
}

/// Build an unembedded chunk with the given source location.
pub fn chunk(id: &str, text: &str, source_path: &str, page_number: u32, chunk_index: usize) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: text.to_string(),
        embedding: Vec::new(),
        source_path: source_path.to_string(),
        page_number,
        chunk_index,
    }
}
