//! Batch enrichment
//!
//! Scores many documents at once. A bad document is recorded in the report
//! and skipped; it never aborts the batch.

pub mod executor;
pub mod types;

pub use executor::{BatchEnricher, BatchEnricherConfig, enrich_batch, enrich_batch_parallel};
pub use types::{BatchError, EnrichmentOutcome, EnrichmentReport, FailureReason};
