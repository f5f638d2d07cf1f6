//! Training data preparation
//!
//! Reads every stored document, scores the batch against one reference time,
//! writes the four score fields back by id and exports a training file.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{PipelineError, PipelineResult};
use crate::batch::{BatchEnricher, BatchEnricherConfig, FailureReason};
use crate::export::{
    ConversationRecord, ExportFormat, PromptRecord, structured_record, write_jsonl,
};
use crate::models::{Document, ScoreFields};
use crate::scoring::{RelevanceScorer, now_reference};
use crate::store::DocumentStore;

/// Counts from one preparation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepareSummary {
    /// Documents read from the store
    pub fetched: usize,
    /// Documents scored
    pub scored: usize,
    /// Documents the scorer rejected
    pub failed: usize,
    /// Why each rejected document was skipped
    pub skipped: Vec<FailureReason>,
    /// Score write-backs the store accepted
    pub updated: usize,
    /// Score write-backs that failed or had no id
    pub update_failures: usize,
    /// Records written to the training file
    pub exported: usize,
    /// Training file path
    pub output: PathBuf,
    /// Training file format
    pub format: ExportFormat,
    /// Scores of the first enriched document
    pub sample: Option<ScoreFields>,
}

/// Fetch, score, write back and export
#[derive(Debug, Clone)]
pub struct PreparePipeline {
    enricher: BatchEnricher,
    output: PathBuf,
    format: ExportFormat,
    parallel: bool,
    reference_time: Option<NaiveDateTime>,
}

impl PreparePipeline {
    /// Create a pipeline writing structured records to `output`
    pub fn new(scorer: RelevanceScorer, output: impl Into<PathBuf>) -> Self {
        Self {
            enricher: BatchEnricher::new(scorer, BatchEnricherConfig::default()),
            output: output.into(),
            format: ExportFormat::Structured,
            parallel: false,
            reference_time: None,
        }
    }

    /// Set the training file format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Score on the rayon worker pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Score against a fixed reference time instead of the current time
    pub fn with_reference_time(mut self, reference: NaiveDateTime) -> Self {
        self.reference_time = Some(reference);
        self
    }

    /// Batch settings for the enricher
    pub fn with_batch_config(mut self, config: BatchEnricherConfig) -> Self {
        self.enricher = BatchEnricher::new(self.enricher.scorer().clone(), config);
        self
    }

    /// Training file path
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the pipeline against `store`
    pub async fn run<S: DocumentStore + ?Sized>(&self, store: &S) -> PipelineResult<PrepareSummary> {
        if !store.ping().await? {
            return Err(PipelineError::StoreUnavailable);
        }

        let documents = store.fetch_all().await?;
        if documents.is_empty() {
            return Err(PipelineError::NoDocuments);
        }
        info!(count = documents.len(), "Fetched documents");

        let reference = self.reference_time.unwrap_or_else(now_reference);
        let report = if self.parallel {
            self.enricher.enrich_parallel(&documents, Some(reference))?
        } else {
            self.enricher.enrich(&documents, Some(reference))
        };
        let skipped = report.failure_reasons();
        let failed = report.failed;
        let enriched = report.into_documents_or_error()?;
        info!(scored = enriched.len(), failed, "Scored documents");

        let (updated, update_failures) = write_back_scores(store, &enriched).await;
        if updated == 0 {
            warn!("No documents were updated in the store");
        }

        let exported = self.export(&enriched)?;
        info!(
            exported,
            output = %self.output.display(),
            format = %self.format,
            "Saved training data"
        );

        Ok(PrepareSummary {
            fetched: documents.len(),
            scored: enriched.len(),
            failed,
            skipped,
            updated,
            update_failures,
            exported,
            output: self.output.clone(),
            format: self.format,
            sample: enriched.first().and_then(Document::scores),
        })
    }

    fn export(&self, documents: &[Document]) -> PipelineResult<usize> {
        let written = match self.format {
            ExportFormat::Structured => {
                write_jsonl(&self.output, documents.iter().map(structured_record))?
            }
            ExportFormat::Prompt => write_jsonl(
                &self.output,
                documents.iter().map(PromptRecord::from_document_lenient),
            )?,
            ExportFormat::Conversation => write_jsonl(
                &self.output,
                documents
                    .iter()
                    .map(|doc| ConversationRecord::from(PromptRecord::from_document_lenient(doc))),
            )?,
        };
        Ok(written)
    }
}

/// Write each document's score fields back by id, returning
/// `(updated, failed)`
async fn write_back_scores<S: DocumentStore + ?Sized>(
    store: &S,
    documents: &[Document],
) -> (usize, usize) {
    let mut updated = 0;
    let mut failed = 0;

    for (i, document) in documents.iter().enumerate() {
        let (Some(id), Some(scores)) = (document.id(), document.scores()) else {
            warn!(index = i, "Document has no id, skipping score update");
            failed += 1;
            continue;
        };

        match store.update_fields(id, scores.to_map()).await {
            Ok(()) => updated += 1,
            Err(e) => {
                warn!(id, "Failed to update document: {}", e);
                failed += 1;
            }
        }

        if (i + 1) % 100 == 0 {
            debug!("Updated {}/{} documents", i + 1, documents.len());
        }
    }

    if failed > 0 {
        warn!(failed, "Some score updates failed");
    }
    (updated, failed)
}
