//! PDF document loading.
//!
//! [`DocumentLoader`] reads every PDF in a directory, extracts per-page
//! text, and splits each page into overlapping chunks. Enumeration is
//! deterministic: non-recursive, files matched by a case-insensitive
//! `.pdf` extension, processed in lexicographic file-name order. Within a
//! file, pages are processed in page order.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::document::{Chunk, PageText};
use crate::error::{Result, SpotterError};

/// Loads PDF documents and splits their pages into chunks.
///
/// Pure with respect to the filesystem: the loader only reads files and
/// holds no state beyond its chunking parameters.
///
/// # Example
///
/// ```rust,ignore
/// use semantic_spotter::DocumentLoader;
///
/// let loader = DocumentLoader::new(1000, 200)?;
/// let chunks = loader.load_documents("policy_documents".as_ref())?;
/// ```
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    chunker: RecursiveChunker,
}

impl DocumentLoader {
    /// Create a loader with the given chunking parameters (in characters).
    ///
    /// # Errors
    ///
    /// Returns [`SpotterError::Configuration`] if `chunk_size` is zero or
    /// `chunk_overlap` is not smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SpotterError::Configuration("chunk_size must be greater than zero".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(SpotterError::Configuration(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunker: RecursiveChunker::new(chunk_size, chunk_overlap) })
    }

    /// Load every PDF in `dir` and return the chunks of all their pages.
    ///
    /// # Errors
    ///
    /// - [`SpotterError::NotFound`] if `dir` does not exist.
    /// - [`SpotterError::Pdf`] if any PDF fails to parse; no partial result
    ///   is returned.
    pub fn load_documents(&self, dir: &Path) -> Result<Vec<Chunk>> {
        if !dir.is_dir() {
            return Err(SpotterError::NotFound { path: dir.to_path_buf() });
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| is_pdf(path))
            .collect();
        files.sort();

        let mut chunks = Vec::new();
        for file in &files {
            chunks.extend(self.chunk_file(file)?);
        }

        info!(directory = %dir.display(), file_count = files.len(), chunk_count = chunks.len(), "loaded documents");
        Ok(chunks)
    }

    /// Load a single PDF file with the same chunking contract.
    ///
    /// # Errors
    ///
    /// - [`SpotterError::NotFound`] if `path` does not exist.
    /// - [`SpotterError::Pdf`] if the file fails to parse.
    pub fn load_single_document(&self, path: &Path) -> Result<Vec<Chunk>> {
        if !path.is_file() {
            return Err(SpotterError::NotFound { path: path.to_path_buf() });
        }
        let chunks = self.chunk_file(path)?;
        info!(file = %path.display(), chunk_count = chunks.len(), "loaded document");
        Ok(chunks)
    }

    fn chunk_file(&self, path: &Path) -> Result<Vec<Chunk>> {
        let pages = extract_pages(path)?;
        let mut chunks = Vec::new();
        for page in &pages {
            if page.text.trim().is_empty() {
                // Scanned or image-only page: nothing to index.
                debug!(file = %path.display(), page = page.page_number, "page has no extractable text");
                continue;
            }
            chunks.extend(self.chunker.chunk(page));
        }
        Ok(chunks)
    }
}

/// Extract per-page text from a PDF, in page order.
fn extract_pages(path: &Path) -> Result<Vec<PageText>> {
    let doc = lopdf::Document::load(path).map_err(|e| SpotterError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys().copied() {
        let text = doc.extract_text(&[page_number]).map_err(|e| SpotterError::Pdf {
            path: path.to_path_buf(),
            message: format!("page {page_number}: {e}"),
        })?;
        pages.push(PageText { source_path: path.to_path_buf(), page_number, text });
    }
    Ok(pages)
}

fn is_pdf(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
}
