//! Document store
//!
//! A [`DocumentStore`] persists structured results and their scores. The
//! [`ElasticStore`] talks to an Elasticsearch-compatible REST API; the
//! [`InMemoryStore`] keeps everything in process.

pub mod elastic;
pub mod errors;
pub mod memory;
pub mod retry;
pub mod traits;

pub use elastic::ElasticStore;
pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use retry::RetryPolicy;
pub use traits::{BulkSummary, DocumentStore, bulk_document_id};
