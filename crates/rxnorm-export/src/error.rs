//! Export error types.

use std::io;
use std::path::Path;

use rxnorm_loader::RrfError;
use thiserror::Error;

/// Errors that end an export run.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Loading the RRF tables failed.
    #[error(transparent)]
    Loader(#[from] RrfError),

    /// An output destination could not be written.
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        /// The destination that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExportError {
    /// Wraps an I/O error with the path it happened on.
    pub fn write_failure(path: &Path, source: io::Error) -> Self {
        Self::WriteFailure {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
