//! Batch enricher for scoring many documents sequentially or on a worker pool

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDateTime;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::types::{BatchError, EnrichmentOutcome, EnrichmentReport};
use crate::models::Document;
use crate::scoring::{RelevanceScorer, now_reference};

/// Configuration for batch enrichment
#[derive(Debug, Clone)]
pub struct BatchEnricherConfig {
    /// Log progress every this many documents (0 disables)
    pub progress_interval: usize,
    /// Worker threads for parallel runs (`None` uses the global pool)
    pub threads: Option<usize>,
}

impl Default for BatchEnricherConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100,
            threads: None,
        }
    }
}

/// Applies a scorer to a batch of documents, tolerating per-document failures
#[derive(Debug, Clone)]
pub struct BatchEnricher {
    scorer: RelevanceScorer,
    config: BatchEnricherConfig,
}

impl BatchEnricher {
    /// Create a new batch enricher
    pub fn new(scorer: RelevanceScorer, config: BatchEnricherConfig) -> Self {
        Self { scorer, config }
    }

    /// Get the scorer
    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Enrich documents one after another
    ///
    /// Every document is scored against the same reference time, resolved
    /// once when `reference_time` is `None`.
    pub fn enrich(
        &self,
        documents: &[Document],
        reference_time: Option<NaiveDateTime>,
    ) -> EnrichmentReport {
        let reference = reference_time.unwrap_or_else(now_reference);
        let mut report = EnrichmentReport::new();

        debug!("Enriching batch of {} documents", documents.len());

        for (index, document) in documents.iter().enumerate() {
            match self.scorer.enrich(document, Some(reference)) {
                Ok(enriched) => report.add_scored(index, enriched),
                Err(e) => {
                    warn!(index, code = e.code(), "Skipping document: {}", e);
                    report.add_failed(index, e);
                }
            }
            self.log_progress(index + 1, documents.len());
        }

        self.log_summary(&report);
        report
    }

    /// Enrich documents on a rayon worker pool
    ///
    /// Outcomes are collected in input order, identical to [`Self::enrich`].
    pub fn enrich_parallel(
        &self,
        documents: &[Document],
        reference_time: Option<NaiveDateTime>,
    ) -> Result<EnrichmentReport, BatchError> {
        let reference = reference_time.unwrap_or_else(now_reference);
        let processed = AtomicUsize::new(0);

        debug!(
            "Enriching batch of {} documents in parallel (threads={:?})",
            documents.len(),
            self.config.threads
        );

        let run = || {
            documents
                .par_iter()
                .enumerate()
                .map(|(index, document)| {
                    let outcome = match self.scorer.enrich(document, Some(reference)) {
                        Ok(enriched) => EnrichmentOutcome::Scored {
                            index,
                            document: enriched,
                        },
                        Err(error) => {
                            warn!(index, code = error.code(), "Skipping document: {}", error);
                            EnrichmentOutcome::Failed { index, error }
                        }
                    };
                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    self.log_progress(done, documents.len());
                    outcome
                })
                .collect::<Vec<_>>()
        };

        let outcomes = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| BatchError::WorkerPool(e.to_string()))?
                .install(run),
            None => run(),
        };

        let report = EnrichmentReport::from_outcomes(outcomes);
        self.log_summary(&report);
        Ok(report)
    }

    fn log_progress(&self, done: usize, total: usize) {
        let interval = self.config.progress_interval;
        if interval > 0 && done % interval == 0 {
            debug!("Processed {}/{} documents", done, total);
        }
    }

    fn log_summary(&self, report: &EnrichmentReport) {
        if report.has_errors() {
            warn!(
                "Scored {} documents, skipped {}",
                report.scored, report.failed
            );
        } else {
            debug!("Scored {} documents", report.scored);
        }
    }
}

/// Enrich a batch sequentially with default settings
pub fn enrich_batch(
    scorer: &RelevanceScorer,
    documents: &[Document],
    reference_time: Option<NaiveDateTime>,
) -> EnrichmentReport {
    BatchEnricher::new(scorer.clone(), BatchEnricherConfig::default())
        .enrich(documents, reference_time)
}

/// Enrich a batch on the global rayon pool
pub fn enrich_batch_parallel(
    scorer: &RelevanceScorer,
    documents: &[Document],
    reference_time: Option<NaiveDateTime>,
) -> EnrichmentReport {
    let enricher = BatchEnricher::new(scorer.clone(), BatchEnricherConfig::default());
    let reference = reference_time.unwrap_or_else(now_reference);
    match enricher.enrich_parallel(documents, Some(reference)) {
        Ok(report) => report,
        // The global pool never fails to build; fall back to sequential
        Err(_) => enricher.enrich(documents, Some(reference)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringConfig;
    use chrono::NaiveDate;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn documents() -> Vec<Document> {
        (1..=10)
            .map(|rank| {
                let doc = Document::new().with("rank", rank).with("title", format!("r{rank}"));
                if rank == 4 {
                    doc
                } else {
                    doc.with("timestamp", "2024-01-01T00:00:00Z")
                }
            })
            .collect()
    }

    #[test]
    fn test_batch_enricher_config_default() {
        let config = BatchEnricherConfig::default();
        assert_eq!(config.progress_interval, 100);
        assert!(config.threads.is_none());
    }

    #[test]
    fn test_partial_failure_keeps_order() {
        let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
        let report = enrich_batch(&scorer, &documents(), Some(reference()));

        assert_eq!(report.scored, 9);
        assert_eq!(report.failed, 1);
        assert_eq!(report.outcomes.len(), 10);
        for (i, outcome) in report.outcomes.iter().enumerate() {
            assert_eq!(outcome.index(), i);
        }
        assert!(!report.outcomes[3].is_scored());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
        let enricher = BatchEnricher::new(
            scorer,
            BatchEnricherConfig {
                progress_interval: 3,
                threads: Some(2),
            },
        );

        let sequential = enricher.enrich(&documents(), Some(reference()));
        let parallel = enricher
            .enrich_parallel(&documents(), Some(reference()))
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_batch() {
        let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
        let report = enrich_batch_parallel(&scorer, &[], None);
        assert_eq!(report.total(), 0);
        assert!(report.into_documents_or_error().unwrap().is_empty());
    }
}
