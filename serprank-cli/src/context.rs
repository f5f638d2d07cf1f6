use std::path::Path;
use std::sync::Arc;

use serprank::config::{ConfigLoader, SerprankConfig};
use serprank::prelude::*;

/// Configuration plus the collaborators commands run against
pub struct CliContext {
    pub config: SerprankConfig,
    pub store: Arc<dyn DocumentStore>,
    fetcher: Option<Arc<dyn PageFetcher>>,
}

impl CliContext {
    /// Load layered configuration and connect to the configured store
    pub fn load(config_path: Option<&Path>) -> serprank::Result<Self> {
        let config = ConfigLoader::load(config_path)?;
        Self::new(config)
    }

    pub fn new(config: SerprankConfig) -> serprank::Result<Self> {
        let store = ElasticStore::new(&config.store)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build a context around an existing store
    pub fn with_store(config: SerprankConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            fetcher: None,
        }
    }

    /// Use `fetcher` instead of a search API client built from configuration
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn fetcher(&self) -> serprank::Result<Arc<dyn PageFetcher>> {
        match &self.fetcher {
            Some(fetcher) => Ok(Arc::clone(fetcher)),
            None => Ok(Arc::new(SerpApiClient::new(&self.config.search_api)?)),
        }
    }

    /// Scorer built from the configured weights
    pub fn scorer(&self) -> serprank::Result<RelevanceScorer> {
        Ok(RelevanceScorer::new(self.config.scoring.clone())?)
    }
}
