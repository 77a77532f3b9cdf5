//! Property tests for the chunking contract: length bound, overlap between
//! consecutive chunks of a page, and lossless de-overlapped reconstruction.

use std::path::PathBuf;

use proptest::prelude::*;

use semantic_spotter::chunking::{Chunker, RecursiveChunker};
use semantic_spotter::document::PageText;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn tail(s: &str, n: usize) -> String {
    let len = char_len(s);
    s.chars().skip(len.saturating_sub(n)).collect()
}

fn page(text: &str) -> PageText {
    PageText { source_path: PathBuf::from("policy.pdf"), page_number: 1, text: text.to_string() }
}

/// Page text built from paragraphs of short sentences, with a few
/// multi-byte characters mixed in to exercise char-boundary slicing.
fn arb_page_text() -> impl Strategy<Value = String> {
    let word = "[a-zé日]{1,12}";
    let sentence = proptest::collection::vec(word, 1..12).prop_map(|ws| ws.join(" ") + ".");
    let paragraph = proptest::collection::vec(sentence, 1..5).prop_map(|ss| ss.join(" "));
    proptest::collection::vec(paragraph, 1..5).prop_map(|ps| ps.join("\n\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every chunk stays within the size limit, consecutive chunks share
    /// the overlap, and stripping the shared prefixes reconstructs the
    /// page text exactly.
    #[test]
    fn chunk_contract_holds(
        text in arb_page_text(),
        chunk_size in 20usize..200,
        overlap_fraction in 0usize..50,
    ) {
        let overlap = chunk_size * overlap_fraction / 100;
        let chunker = RecursiveChunker::new(chunk_size, overlap);
        let chunks = chunker.chunk(&page(&text));

        prop_assert!(!chunks.is_empty());

        for chunk in &chunks {
            prop_assert!(
                char_len(&chunk.text) <= chunk_size,
                "chunk '{}' has {} chars, limit {}",
                chunk.id,
                char_len(&chunk.text),
                chunk_size,
            );
        }

        // Walk the chunks, checking the shared prefix and rebuilding the page.
        let mut rebuilt = chunks[0].text.clone();
        for chunk in &chunks[1..] {
            let shared = overlap.min(char_len(&rebuilt));
            let expected_seed = tail(&rebuilt, shared);
            prop_assert!(
                chunk.text.starts_with(&expected_seed),
                "chunk '{}' does not start with the previous tail",
                chunk.id,
            );
            let body: String = chunk.text.chars().skip(shared).collect();
            rebuilt.push_str(&body);
        }
        prop_assert_eq!(rebuilt, text);
    }

    /// Source location and ordering metadata survive chunking.
    #[test]
    fn chunks_carry_their_source_location(
        text in arb_page_text(),
        chunk_size in 20usize..200,
    ) {
        let chunker = RecursiveChunker::new(chunk_size, 0);
        let chunks = chunker.chunk(&page(&text));

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.chunk_index, i);
            prop_assert_eq!(chunk.page_number, 1);
            prop_assert_eq!(chunk.source_path.as_str(), "policy.pdf");
            let expected_id = format!("policy_p1_{i}");
            prop_assert_eq!(chunk.id.as_str(), expected_id.as_str());
            prop_assert!(chunk.embedding.is_empty());
        }
    }
}

#[test]
fn empty_page_produces_no_chunks() {
    let chunker = RecursiveChunker::new(100, 20);
    assert!(chunker.chunk(&page("")).is_empty());
}

#[test]
fn short_page_is_a_single_chunk() {
    let chunker = RecursiveChunker::new(100, 20);
    let chunks = chunker.chunk(&page("Disability coverage pays 60% of salary."));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Disability coverage pays 60% of salary.");
}

#[test]
fn paragraph_boundaries_are_preferred_over_hard_cuts() {
    let text = "First paragraph about dental coverage.\n\nSecond paragraph about vision.";
    let chunker = RecursiveChunker::new(45, 0);
    let chunks = chunker.chunk(&page(text));

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "First paragraph about dental coverage.\n\n");
    assert_eq!(chunks[1].text, "Second paragraph about vision.");
}

#[test]
fn consecutive_chunks_share_the_overlap() {
    // Body size is 30 - 10 = 20 chars; the sentences force two chunks.
    let text = "alpha beta gamma del. epsilon zeta eta theta.";
    let chunker = RecursiveChunker::new(30, 10);
    let chunks = chunker.chunk(&page(text));

    assert!(chunks.len() >= 2);
    let prev_tail = tail(&chunks[0].text, 10);
    assert!(chunks[1].text.starts_with(&prev_tail));
}
