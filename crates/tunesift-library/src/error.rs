//! Error types for loading a library.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading a library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Failed to read the library file.
    #[error("failed to read library {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The library file is not a JSON array of song objects.
    #[error("invalid library {path}: {source}")]
    Parse {
        /// Path to the malformed file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
