//! Trait definitions for document stores

use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::StoreResult;
use crate::models::{Category, Document};

/// Outcome of a bulk index request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    /// Documents accepted by the store
    pub indexed: usize,
    /// Documents the store rejected
    pub failed: usize,
    /// One message per rejected document
    pub errors: Vec<String>,
}

impl BulkSummary {
    /// Check if every document was indexed
    pub fn all_successful(&self) -> bool {
        self.failed == 0
    }
}

/// A searchable store of result documents
///
/// Requests are issued one after another; implementations need not support
/// concurrent calls beyond being shareable.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Name of the results index
    fn index_name(&self) -> &str;

    /// Check whether the store is reachable
    async fn ping(&self) -> StoreResult<bool>;

    /// Check whether the results index exists
    async fn index_exists(&self) -> StoreResult<bool>;

    /// Create the results index if missing, returning `true` when created
    async fn ensure_index(&self) -> StoreResult<bool>;

    /// Index documents in one request
    ///
    /// Document ids are `{query}_{category}_{rank}_{position}`. An empty slice
    /// is a successful no-op.
    async fn bulk_index(&self, documents: &[Document]) -> StoreResult<BulkSummary>;

    /// Search by query text (every document when `None`), optionally
    /// restricted to a category, ordered by rank
    ///
    /// Returned documents carry their store id in `_id`.
    async fn search(
        &self,
        query: Option<&str>,
        category: Option<Category>,
        size: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Read every document, each carrying its store id in `_id`
    async fn fetch_all(&self) -> StoreResult<Vec<Document>>;

    /// Merge `fields` into the stored document `id`
    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> StoreResult<()>;

    /// Number of documents in the index
    async fn count(&self) -> StoreResult<usize>;
}

/// Deterministic bulk id for the document at `position` in a batch
pub fn bulk_document_id(document: &Document, position: usize) -> Result<String, String> {
    use crate::models::fields;

    let part = |key: &str| -> Result<String, String> {
        match document.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(_) => Err(format!("field '{}' cannot be part of a document id", key)),
            None => Err(format!("missing '{}' field", key)),
        }
    };

    Ok(format!(
        "{}_{}_{}_{}",
        part(fields::QUERY)?,
        part(fields::CATEGORY)?,
        part(fields::RANK)?,
        position
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_document_id() {
        let doc = Document::new()
            .with("query", "rust async")
            .with("category", "video")
            .with("rank", 2);
        assert_eq!(bulk_document_id(&doc, 5).unwrap(), "rust async_video_2_5");

        let missing = Document::new().with("query", "q").with("rank", 1);
        assert!(bulk_document_id(&missing, 0).unwrap_err().contains("category"));
    }
}
