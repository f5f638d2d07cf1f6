//! Configuration validation utilities.
//!
//! This module provides validation functions for configuration values.

use super::models::*;
use super::{ConfigError, LEGACY_SEARCH_API_KEY, LEGACY_STORE_API_KEY};

/// Validate the entire configuration.
pub fn validate_config(config: &SerprankConfig) -> Result<(), ConfigError> {
    config
        .scoring
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    validate_search_api_config(&config.search_api)?;
    validate_store_config(&config.store)?;
    validate_export_config(&config.export)?;

    Ok(())
}

/// Check that the credentials needed to run the ingest pipeline are set.
///
/// The search API key is always required. Hosted store deployments also need
/// a store API key; local deployments only get a warning when the default URL
/// is in use.
pub fn validate_credentials(config: &SerprankConfig) -> Result<(), ConfigError> {
    let mut missing = Vec::new();

    if config
        .search_api
        .api_key
        .as_deref()
        .is_none_or(str::is_empty)
    {
        missing.push(LEGACY_SEARCH_API_KEY.to_string());
    }

    if config.store.is_cloud_deployment() {
        if config.store.api_key.as_deref().is_none_or(str::is_empty) {
            missing.push(LEGACY_STORE_API_KEY.to_string());
        }
    } else if config.store.is_default_local() {
        tracing::warn!(
            "Using default local store URL; set ELASTIC_URL or store.url for a hosted deployment"
        );
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingCredentials(missing))
    }
}

fn validate_search_api_config(config: &SearchApiConfig) -> Result<(), ConfigError> {
    if config.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Search API endpoint cannot be empty".to_string(),
        ));
    }
    if config.engine.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Search engine cannot be empty".to_string(),
        ));
    }
    if config.results_per_page == 0 {
        return Err(ConfigError::ValidationError(
            "results_per_page must be greater than 0".to_string(),
        ));
    }
    if config.timeout.is_zero() {
        return Err(ConfigError::ValidationError(
            "Search API timeout must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Store URL cannot be empty".to_string(),
        ));
    }
    if !(config.url.starts_with("http://") || config.url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "Store URL must start with http:// or https://: {}",
            config.url
        )));
    }
    if config.index.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Store index cannot be empty".to_string(),
        ));
    }
    if config.scroll_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "scroll_page_size must be greater than 0".to_string(),
        ));
    }
    if config.scroll_keep_alive.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "scroll_keep_alive cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("training_file", &config.training_file),
        ("prompt_file", &config.prompt_file),
        ("conversation_file", &config.conversation_file),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Export {} cannot be empty",
                name
            )));
        }
    }
    Ok(())
}
