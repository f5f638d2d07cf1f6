//! Error types for document store operations

/// Error type for document store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure (connection refused, DNS, TLS)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("Store returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Document or index not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A document cannot be stored as given
    #[error("Invalid document at index {index}: {reason}")]
    InvalidDocument {
        /// Position in the submitted batch
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Response(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether retrying the request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// 5xx and 429 responses are transient
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout(err.to_string())
        } else if err.is_decode() {
            StoreError::Response(err.to_string())
        } else if let Some(status) = err.status() {
            StoreError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            StoreError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::Connection("refused".to_string()).is_retryable());
        assert!(StoreError::Timeout("slow".to_string()).is_retryable());
        assert!(
            StoreError::Http {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            StoreError::Http {
                status: 429,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !StoreError::Http {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!StoreError::NotFound("doc".to_string()).is_retryable());
    }
}
