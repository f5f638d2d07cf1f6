//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::Path;
use std::time::Duration;

/// Builder for creating SerprankConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: SerprankConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: SerprankConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: SerprankConfig) -> Self {
        Self { config }
    }

    /// Set the scoring configuration
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Set the scoring weights and decay
    pub fn with_weights(mut self, base_weight: f64, recency_weight: f64, decay_days: f64) -> Self {
        self.config.scoring.base_weight = base_weight;
        self.config.scoring.recency_weight = recency_weight;
        self.config.scoring.decay_days = decay_days;
        self
    }

    /// Set the search API key
    pub fn with_search_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.search_api.api_key = Some(key.into());
        self
    }

    /// Set the search API endpoint
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.search_api.endpoint = endpoint.into();
        self
    }

    /// Set results per page and the default page count
    pub fn with_pagination(mut self, results_per_page: usize, max_pages: usize) -> Self {
        self.config.search_api.results_per_page = results_per_page;
        self.config.search_api.max_pages = max_pages;
        self
    }

    /// Set the store URL
    pub fn with_store_url(mut self, url: impl Into<String>) -> Self {
        self.config.store.url = url.into();
        self
    }

    /// Set the store API key
    pub fn with_store_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.store.api_key = Some(key.into());
        self
    }

    /// Set the store index
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.config.store.index = index.into();
        self
    }

    /// Set the store request timeout
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.config.store.timeout = timeout;
        self
    }

    /// Set the export output directory
    pub fn with_output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.export.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Log to a file
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Development configuration: debug logging, pretty output
    pub fn development() -> Self {
        Self::new()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
    }

    /// Testing configuration: warnings only, local store, scratch output
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .with_output_dir("./test_output")
            .with_index("search_results_test")
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<SerprankConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
