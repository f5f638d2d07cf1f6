//! Error types for scoring operations

/// Per-document validation failures raised by the scorer
///
/// These are deterministic: retrying the same document yields the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// Rank is zero or negative
    #[error("Invalid rank {rank}: rank must be a positive, 1-indexed position")]
    InvalidRank {
        /// The rejected rank
        rank: i64,
    },

    /// Timestamp could not be parsed as ISO-8601
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        /// The rejected input
        value: String,
        /// Parser detail
        reason: String,
    },

    /// A required field is absent from the document
    #[error("Document missing '{field}' field")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// A field is present but holds the wrong JSON type
    #[error("Field '{field}' must be {expected}")]
    InvalidFieldType {
        /// Name of the offending field
        field: String,
        /// Description of the accepted type
        expected: String,
    },

    /// Scoring configuration rejected at construction
    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),
}

impl ScoringError {
    /// Short machine-readable code for reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRank { .. } => "invalid_rank",
            Self::InvalidTimestamp { .. } => "invalid_timestamp",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidFieldType { .. } => "invalid_field_type",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type for scoring operations
pub type ScoringResult<T> = Result<T, ScoringError>;
