//! # serprank
//!
//! Relevance scoring and training-data preparation for search engine results.
//!
//! Results are fetched from a SerpAPI-compatible endpoint, classified into
//! videos and articles, indexed into an Elasticsearch-compatible store, scored
//! from their rank and age, and exported as JSON-Lines training files.
//!
//! ## Quick Start
//!
//! ```rust
//! use serprank::prelude::*;
//! use serde_json::json;
//!
//! let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
//! let document = Document::from_value(json!({
//!     "rank": 1,
//!     "timestamp": "2024-01-15T10:30:00Z"
//! }))
//! .unwrap();
//!
//! let reference = parse_timestamp("2024-01-15T12:00:00Z").unwrap();
//! let enriched = scorer.enrich(&document, Some(reference)).unwrap();
//! assert_eq!(enriched.get_f64("relevance_score"), Some(1.0));
//! ```
//!
//! ## Architecture
//!
//! - [`scoring`]: the pure, thread-safe scorer
//! - [`batch`]: sequential and worker-pool enrichment of many documents
//! - [`classify`]: routing raw hits into categories and structuring them
//! - [`search_api`]: paginated result fetching
//! - [`store`]: document persistence (REST and in-memory)
//! - [`export`]: training file formats and converters
//! - [`pipeline`]: the ingest, prepare, verify and view flows

pub mod batch;
pub mod classify;
pub mod config;
pub mod export;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod scoring;
pub mod search_api;
pub mod store;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{BatchEnricher, EnrichmentReport, enrich_batch, enrich_batch_parallel};
    pub use crate::classify::{categorize_results, classify_item, structure_results};
    pub use crate::config::{ConfigBuilder, ConfigLoader, LogLevel, SerprankConfig};
    pub use crate::export::{ExportFormat, PromptRecord, TargetFormat, convert_file};
    pub use crate::models::{Category, Document, RawHit, ScoreFields};
    pub use crate::pipeline::{PreparePipeline, process_query, verify_scores, view_results};
    pub use crate::scoring::{
        EngagementSignal, RelevanceScorer, ScoringConfig, ScoringError, parse_timestamp,
    };
    pub use crate::search_api::{PageFetcher, SerpApiClient};
    pub use crate::store::{DocumentStore, ElasticStore, InMemoryStore};

    pub use crate::{Result, SerprankError};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for serprank operations
#[derive(Debug, thiserror::Error)]
pub enum SerprankError {
    /// Scoring rejected a document or configuration
    #[error("Scoring error: {0}")]
    Scoring(#[from] scoring::ScoringError),

    /// Batch enrichment produced nothing
    #[error("Batch error: {0}")]
    Batch(#[from] batch::BatchError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// Search API failure
    #[error("Search API error: {0}")]
    SearchApi(#[from] search_api::SearchApiError),

    /// Document store failure
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    /// Training export failure
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    /// A pipeline could not complete
    #[error("{0}")]
    Pipeline(#[from] pipeline::PipelineError),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

/// Result type for serprank operations
pub type Result<T> = std::result::Result<T, SerprankError>;
