//! Page chunking.
//!
//! [`RecursiveChunker`] splits a page hierarchically — paragraphs first,
//! then sentences, then whitespace, then hard character cuts — and seeds
//! each chunk with the tail of the text before it so that consecutive
//! chunks of a page share `chunk_overlap` characters. All sizes are
//! measured in characters and all slicing lands on `char` boundaries.

use crate::document::{Chunk, PageText};

/// Separator hierarchy, tried in order: paragraph, sentence, whitespace.
const SEPARATORS: [&str; 4] = ["\n\n", ". ", "! ", "? "];

/// A strategy for splitting one extracted page into chunks.
///
/// Implementations produce [`Chunk`]s with text and source location but no
/// embeddings; embeddings are attached during index creation.
pub trait Chunker: Send + Sync {
    /// Split a page into chunks.
    ///
    /// Returns an empty `Vec` if the page has no text.
    fn chunk(&self, page: &PageText) -> Vec<Chunk>;
}

/// Splits pages hierarchically with overlapping chunks.
///
/// The page text is first cut losslessly into pieces of at most
/// `chunk_size - chunk_overlap` characters, preferring paragraph and
/// sentence boundaries before falling back to whitespace and hard cuts.
/// Each chunk after the first is then prefixed with the last
/// `chunk_overlap` characters of the page text preceding its piece, so a
/// chunk never exceeds `chunk_size` characters and the de-overlapped
/// concatenation of chunks reproduces the page text exactly.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// `chunk_overlap` must be smaller than `chunk_size`; the loader and
    /// config builder validate this before construction. An overlap equal
    /// to or larger than the size is clamped to `chunk_size - 1`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self { chunk_size, chunk_overlap: chunk_overlap.min(chunk_size - 1) }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, page: &PageText) -> Vec<Chunk> {
        if page.text.is_empty() {
            return Vec::new();
        }

        let body_size = self.chunk_size - self.chunk_overlap;
        let pieces = split_and_merge(&page.text, body_size, &SEPARATORS);

        let stem = page
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let source_path = page.source_path.to_string_lossy().into_owned();

        let mut chunks = Vec::with_capacity(pieces.len());
        let mut consumed = String::new();
        for (chunk_index, piece) in pieces.into_iter().enumerate() {
            let text = if chunk_index == 0 {
                piece.clone()
            } else {
                let seed = tail_chars(&consumed, self.chunk_overlap);
                format!("{seed}{piece}")
            };
            chunks.push(Chunk {
                id: format!("{stem}_p{}_{chunk_index}", page.page_number),
                text,
                embedding: Vec::new(),
                source_path: source_path.clone(),
                page_number: page.page_number,
                chunk_index,
            });
            consumed.push_str(&piece);
        }

        chunks
    }
}

/// Split text losslessly into pieces of at most `max_chars` characters,
/// preferring the given separators before falling back to whitespace and
/// then hard character cuts. Concatenating the pieces reproduces `text`.
fn split_and_merge(text: &str, max_chars: usize, separators: &[&str]) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }

    let segments: Vec<&str> = match separators.first() {
        Some(separator) => split_keeping_separator(text, separator),
        // Separators exhausted: split on whitespace, keeping the spaces.
        None => text.split_inclusive(' ').collect(),
    };
    let deeper: Option<&[&str]> = if separators.is_empty() { None } else { Some(&separators[1..]) };

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for segment in segments {
        let segment_len = char_len(segment);
        if current_len > 0 && current_len + segment_len > max_chars {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if segment_len > max_chars {
            // A single oversized segment: descend to the next separator
            // level, or hard-cut once whitespace is exhausted too.
            match deeper {
                Some(rest) => pieces.extend(split_and_merge(segment, max_chars, rest)),
                None => pieces.extend(split_by_chars(segment, max_chars)),
            }
        } else {
            current.push_str(segment);
            current_len += segment_len;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Hard character-count splitting, used only when no separator fits.
fn split_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            pieces.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Number of `char`s in a string.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The last `n` characters of `s` (the whole string if shorter).
pub(crate) fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((start, _)) => &s[start..],
        None => s,
    }
}
