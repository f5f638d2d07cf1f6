//! SerpAPI HTTP client

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::errors::{SearchApiError, SearchApiResult};
use crate::config::SearchApiConfig;

/// Fetches one page of raw search-engine JSON
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `num` results starting at offset `start`
    async fn fetch_page(&self, query: &str, start: usize, num: usize) -> SearchApiResult<Value>;
}

/// SerpAPI client issuing one GET per page
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine: String,
}

impl SerpApiClient {
    /// Create a client from the search API configuration
    pub fn new(config: &SearchApiConfig) -> SearchApiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SearchApiError::Configuration("search API key is not set".to_string()))?;

        Self::with_endpoint(&config.endpoint, api_key, &config.engine, config.timeout)
    }

    /// Create a client against an explicit endpoint
    pub fn with_endpoint(
        endpoint: &str,
        api_key: String,
        engine: &str,
        timeout: Duration,
    ) -> SearchApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("serprank/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                SearchApiError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
            engine: engine.to_string(),
        })
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PageFetcher for SerpApiClient {
    async fn fetch_page(&self, query: &str, start: usize, num: usize) -> SearchApiResult<Value> {
        debug!("GET {} (q={:?}, start={}, num={})", self.endpoint, query, start, num);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("engine", self.engine.as_str()),
            ])
            .query(&[("num", num), ("start", start)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // SerpAPI reports most failures as JSON with an "error" key
            if let Ok(value) = serde_json::from_str::<Value>(&body)
                && value.get("error").is_some()
            {
                return Ok(value);
            }
            return Err(SearchApiError::Http {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = SearchApiConfig::default();
        assert!(matches!(
            SerpApiClient::new(&config),
            Err(SearchApiError::Configuration(_))
        ));

        let config = SearchApiConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let client = SerpApiClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "https://serpapi.com/search.json");
    }
}
