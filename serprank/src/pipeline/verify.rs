//! Score verification against a sample stored document

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{PipelineError, PipelineResult};
use crate::models::{Document, fields};
use crate::store::DocumentStore;

/// Fields every ingested document should carry
pub const REQUIRED_FIELDS: &[&str] = &[fields::QUERY, fields::TITLE, fields::RANK, fields::TIMESTAMP];

/// Presence of one field on the sample document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCheck {
    /// Field name
    pub field: String,
    /// Field value, `None` when absent
    pub value: Option<Value>,
}

impl FieldCheck {
    fn of(document: &Document, field: &str) -> Self {
        Self {
            field: field.to_string(),
            value: document.get(field).cloned(),
        }
    }

    /// Whether the field is present
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// What verification found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyReport {
    /// Documents in the index
    pub total: usize,
    /// Id of the sampled document
    pub sample_id: Option<String>,
    /// Required ingestion fields on the sample
    pub required: Vec<FieldCheck>,
    /// Score fields on the sample
    pub scores: Vec<FieldCheck>,
}

impl VerifyReport {
    /// Whether the sample carries all four score fields
    pub fn has_scores(&self) -> bool {
        !self.scores.is_empty() && self.scores.iter().all(FieldCheck::is_present)
    }

    /// Whether the sample carries every required ingestion field
    pub fn has_required_fields(&self) -> bool {
        !self.required.is_empty() && self.required.iter().all(FieldCheck::is_present)
    }
}

/// Inspect one stored document for required and score fields
///
/// Fails when the store is unreachable, the index is missing, or it holds
/// no documents.
pub async fn verify_scores<S: DocumentStore + ?Sized>(store: &S) -> PipelineResult<VerifyReport> {
    if !store.ping().await? {
        return Err(PipelineError::StoreUnavailable);
    }
    if !store.index_exists().await? {
        return Err(PipelineError::IndexMissing(store.index_name().to_string()));
    }

    let total = store.count().await?;
    if total == 0 {
        return Err(PipelineError::NoDocuments);
    }

    let sample = store
        .search(None, None, 1)
        .await?
        .into_iter()
        .next()
        .ok_or(PipelineError::NoDocuments)?;

    let report = VerifyReport {
        total,
        sample_id: sample.id().map(str::to_string),
        required: REQUIRED_FIELDS
            .iter()
            .map(|field| FieldCheck::of(&sample, field))
            .collect(),
        scores: fields::SCORE_FIELDS
            .iter()
            .map(|field| FieldCheck::of(&sample, field))
            .collect(),
    };
    info!(total, has_scores = report.has_scores(), "Verified stored scores");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use serde_json::json;

    fn ingested() -> Document {
        Document::new()
            .with("query", "rust")
            .with("title", "Intro")
            .with("rank", 1)
            .with("timestamp", "2024-01-15T10:30:00Z")
    }

    #[tokio::test]
    async fn test_verify_without_scores() {
        let store = InMemoryStore::with_documents([("a", ingested())]);
        let report = verify_scores(&store).await.unwrap();

        assert_eq!(report.total, 1);
        assert_eq!(report.sample_id.as_deref(), Some("a"));
        assert!(report.has_required_fields());
        assert!(!report.has_scores());
    }

    #[tokio::test]
    async fn test_verify_with_scores() {
        let scored = ingested()
            .with("base_rank_score", 1.0)
            .with("recency_score", 1.0)
            .with("relevance_score", 1.0)
            .with("user_engagement_score", 0.5);
        let store = InMemoryStore::with_documents([("a", scored)]);

        let report = verify_scores(&store).await.unwrap();
        assert!(report.has_scores());
        assert_eq!(report.scores[3].value, Some(json!(0.5)));
    }

    #[tokio::test]
    async fn test_verify_missing_index() {
        let result = verify_scores(&InMemoryStore::new()).await;
        assert!(matches!(result, Err(PipelineError::IndexMissing(_))));
    }

    #[tokio::test]
    async fn test_verify_empty_index() {
        let store = InMemoryStore::new();
        store.ensure_index().await.unwrap();
        let result = verify_scores(&store).await;
        assert!(matches!(result, Err(PipelineError::NoDocuments)));
    }
}
