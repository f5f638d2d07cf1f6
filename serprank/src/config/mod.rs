//! Configuration system for serprank.
//!
//! This module provides a layered configuration system that supports loading
//! configuration from multiple sources (files, `.env`, environment variables)
//! with validation and defaults.

mod builder;
mod loader;
mod models;
#[cfg(test)]
mod tests;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;
pub use validation::{validate_config, validate_credentials};

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "serprank.toml",
    "serprank.yaml",
    "serprank.yml",
    "serprank.json",
    ".serprank/config.toml",
    ".serprank/config.yaml",
    ".serprank/config.yml",
    ".serprank/config.json",
];

/// Environment variable prefix for serprank configuration
pub const ENV_PREFIX: &str = "SERPRANK_";

/// Legacy variable holding the search API key
pub const LEGACY_SEARCH_API_KEY: &str = "SERPAPI_KEY";

/// Legacy variable holding the store URL
pub const LEGACY_STORE_URL: &str = "ELASTIC_URL";

/// Legacy variable holding the store API key
pub const LEGACY_STORE_API_KEY: &str = "ELASTIC_API_KEY";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during environment loading
    #[error("Failed to load environment variables: {0}")]
    EnvLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),

    /// Required credentials are not set
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
