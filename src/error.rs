//! Error types for the `semantic-spotter` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, indexing, or answering.
#[derive(Debug, Error)]
pub enum SpotterError {
    /// A directory, file, or persisted index path does not exist.
    #[error("not found: {}", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A PDF could not be read or parsed.
    #[error("PDF error in {}: {message}", path.display())]
    Pdf {
        /// The PDF file that failed.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// The embedding provider failed (auth, network, rate limit, malformed response).
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The generation provider failed (auth, network, rate limit, malformed response).
    #[error("generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A persisted index disagrees with the current embedding configuration,
    /// or its on-disk format is not readable.
    #[error("index corrupt: {0}")]
    IndexCorrupt(String),

    /// A configuration validation error (missing credential, invalid parameters).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An I/O failure while reading documents or persisting the index.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for spotter operations.
pub type Result<T> = std::result::Result<T, SpotterError>;
