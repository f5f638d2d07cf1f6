//! Error types for search API operations

/// Error type for search API operations
#[derive(Debug, thiserror::Error)]
pub enum SearchApiError {
    /// Client misconfigured (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("Search API returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response body was not the expected JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The query produced no results across all pages
    #[error("No search results found for query: '{query}'")]
    NoResults {
        /// The query that was searched
        query: String,
    },
}

impl From<reqwest::Error> for SearchApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

/// Result type for search API operations
pub type SearchApiResult<T> = Result<T, SearchApiError>;
