//! Batch enrichment types
//!
//! A batch run produces one outcome per input document, in input order, so a
//! caller can always match a failure back to the record that caused it.

use serde::Serialize;

use crate::models::Document;
use crate::scoring::ScoringError;

/// Result of enriching a single document in a batch
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Document was scored
    Scored {
        /// Index in the input slice
        index: usize,
        /// The enriched copy
        document: Document,
    },

    /// Document was rejected by the scorer
    Failed {
        /// Index in the input slice
        index: usize,
        /// Why it was rejected
        error: ScoringError,
    },
}

impl EnrichmentOutcome {
    /// Index in the input slice
    pub fn index(&self) -> usize {
        match self {
            Self::Scored { index, .. } | Self::Failed { index, .. } => *index,
        }
    }

    /// Whether the document was scored
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }
}

/// Per-document failure summary for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    /// Index in the input slice
    pub index: usize,
    /// Short error code
    pub code: &'static str,
    /// First line of the error message
    pub reason: String,
}

/// Outcome of a batch enrichment run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    /// One outcome per input document, in input order
    pub outcomes: Vec<EnrichmentOutcome>,
    /// Number of documents scored
    pub scored: usize,
    /// Number of documents rejected
    pub failed: usize,
}

impl EnrichmentReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from ordered outcomes
    pub fn from_outcomes(outcomes: Vec<EnrichmentOutcome>) -> Self {
        let scored = outcomes.iter().filter(|o| o.is_scored()).count();
        let failed = outcomes.len() - scored;
        Self {
            outcomes,
            scored,
            failed,
        }
    }

    /// Record a scored document
    pub fn add_scored(&mut self, index: usize, document: Document) {
        self.outcomes
            .push(EnrichmentOutcome::Scored { index, document });
        self.scored += 1;
    }

    /// Record a rejected document
    pub fn add_failed(&mut self, index: usize, error: ScoringError) {
        self.outcomes.push(EnrichmentOutcome::Failed { index, error });
        self.failed += 1;
    }

    /// Number of documents processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Check if every document was scored
    pub fn all_successful(&self) -> bool {
        self.failed == 0
    }

    /// Check if any document failed
    pub fn has_errors(&self) -> bool {
        self.failed > 0
    }

    /// Enriched documents, in input order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.outcomes.iter().filter_map(|o| match o {
            EnrichmentOutcome::Scored { document, .. } => Some(document),
            EnrichmentOutcome::Failed { .. } => None,
        })
    }

    /// Failures as `(index, code, first line of the message)`
    pub fn failure_reasons(&self) -> Vec<FailureReason> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                EnrichmentOutcome::Failed { index, error } => Some(FailureReason {
                    index: *index,
                    code: error.code(),
                    reason: first_line(&error.to_string()),
                }),
                EnrichmentOutcome::Scored { .. } => None,
            })
            .collect()
    }

    /// Take the enriched documents, failing only when nothing could be scored
    ///
    /// An empty input is not an error.
    pub fn into_documents_or_error(self) -> Result<Vec<Document>, BatchError> {
        if self.scored == 0 && self.failed > 0 {
            let first_reason = self
                .failure_reasons()
                .into_iter()
                .next()
                .map(|f| f.reason)
                .unwrap_or_default();
            return Err(BatchError::NoDocumentsScored {
                attempted: self.failed,
                first_reason,
            });
        }

        Ok(self
            .outcomes
            .into_iter()
            .filter_map(|o| match o {
                EnrichmentOutcome::Scored { document, .. } => Some(document),
                EnrichmentOutcome::Failed { .. } => None,
            })
            .collect())
    }
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

/// Errors raised by batch enrichment as a whole
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchError {
    /// Every document in a non-empty batch failed
    #[error("No documents could be scored ({attempted} attempted); first failure: {first_reason}")]
    NoDocumentsScored {
        /// Number of documents attempted
        attempted: usize,
        /// First failure message
        first_reason: String,
    },

    /// Worker pool could not be built
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_timestamp() -> ScoringError {
        ScoringError::MissingField {
            field: "timestamp".to_string(),
        }
    }

    #[test]
    fn test_report_creation() {
        let report = EnrichmentReport::new();
        assert_eq!(report.scored, 0);
        assert_eq!(report.failed, 0);
        assert!(report.all_successful());
        assert_eq!(report.into_documents_or_error(), Ok(Vec::new()));
    }

    #[test]
    fn test_report_mixed() {
        let mut report = EnrichmentReport::new();
        report.add_scored(0, Document::new().with("rank", 1));
        report.add_failed(1, missing_timestamp());
        report.add_scored(2, Document::new().with("rank", 3));

        assert_eq!(report.scored, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), 3);
        assert!(report.has_errors());
        assert_eq!(report.documents().count(), 2);

        let reasons = report.failure_reasons();
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].index, 1);
        assert_eq!(reasons[0].code, "missing_field");
        assert_eq!(reasons[0].reason, "Document missing 'timestamp' field");

        let docs = report.into_documents_or_error().unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_report_all_failed() {
        let report = EnrichmentReport::from_outcomes(vec![
            EnrichmentOutcome::Failed {
                index: 0,
                error: missing_timestamp(),
            },
            EnrichmentOutcome::Failed {
                index: 1,
                error: ScoringError::InvalidRank { rank: 0 },
            },
        ]);
        assert_eq!(report.failed, 2);

        match report.into_documents_or_error() {
            Err(BatchError::NoDocumentsScored {
                attempted,
                first_reason,
            }) => {
                assert_eq!(attempted, 2);
                assert!(first_reason.contains("timestamp"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("one\ntwo"), "one");
        assert_eq!(first_line(""), "");
    }
}
