//! End-to-end pipelines over the fetcher, classifier, scorer and store
//!
//! - [`ingest`]: search, classify, structure and index one query
//! - [`prepare`]: score everything in the store, write scores back, export
//! - [`verify`]: check that stored documents carry score fields
//! - [`view`]: list stored results

pub mod ingest;
pub mod prepare;
pub mod verify;
pub mod view;

pub use ingest::{IngestSummary, process_query, process_query_at};
pub use prepare::{PreparePipeline, PrepareSummary};
pub use verify::{FieldCheck, VerifyReport, verify_scores};
pub use view::{ViewSummary, view_results};

use crate::batch::BatchError;
use crate::export::ExportError;
use crate::search_api::SearchApiError;
use crate::store::StoreError;

/// Error type for pipeline runs
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The store did not answer a ping
    #[error("Document store is unavailable")]
    StoreUnavailable,

    /// The results index does not exist
    #[error("Index '{0}' does not exist")]
    IndexMissing(String),

    /// The store holds no documents
    #[error("No documents found in the store")]
    NoDocuments,

    /// Store request failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Search API request failed
    #[error(transparent)]
    Search(#[from] SearchApiError),

    /// Nothing in the batch could be scored
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Writing the training file failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;
