//! Error types for training export

use std::path::PathBuf;

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Input file does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// A record lacks fields a format requires
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A line could not be parsed
    #[error("Line {line} is not valid JSON: {reason}")]
    InvalidLine {
        /// 1-indexed line number
        line: usize,
        /// Parser message
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
