//! Corpus loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the word or definition corpus at startup.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A corpus file could not be read.
    #[error("cannot read corpus file {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A corpus file is not valid JSON of the expected shape.
    #[error("malformed corpus file {path}: {source}")]
    Json {
        /// The file that failed.
        path: PathBuf,
        /// Underlying decode error.
        source: serde_json::Error,
    },
}
