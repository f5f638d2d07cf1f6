//! Relevance scorer
//!
//! Converts a document's rank and timestamp into a bounded relevance score and
//! enriches document records with the computed fields.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::config::{ScoringConfig, WeightWarning};
use super::engagement::{ConstantEngagement, EngagementSignal};
use super::error::{ScoringError, ScoringResult};
use super::timestamp::{TimestampInput, days_between, now_reference};
use crate::models::{Document, ScoreFields, fields};

/// Callback invoked once at construction when the weights do not sum to 1.0
pub type WeightWarningHook = Arc<dyn Fn(&WeightWarning) + Send + Sync>;

/// Round to six decimal places, the precision stored on documents
///
/// Rounds the exact decimal value of `value`, with ties going to the even
/// digit, so `0.0078125` becomes `0.007812`.
pub fn round_score(value: f64) -> f64 {
    format!("{:.6}", value).parse().unwrap_or(value)
}

/// Pure, stateless-per-call relevance scorer
///
/// The scorer holds only its immutable configuration and engagement strategy,
/// so it can be shared freely across threads.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use serprank::models::Document;
/// use serprank::scoring::{RelevanceScorer, ScoringConfig};
///
/// let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
/// let reference = NaiveDate::from_ymd_opt(2024, 3, 1)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
///
/// let doc = Document::new()
///     .with("rank", 1)
///     .with("timestamp", "2024-03-01T00:00:00Z");
/// let enriched = scorer.enrich(&doc, Some(reference)).unwrap();
/// assert_eq!(enriched.get_f64("relevance_score"), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    config: ScoringConfig,
    engagement: Arc<dyn EngagementSignal>,
}

impl RelevanceScorer {
    /// Create a scorer with the constant engagement strategy and the default
    /// (logging) weight warning hook
    pub fn new(config: ScoringConfig) -> ScoringResult<Self> {
        Self::builder(config).build()
    }

    /// Start building a scorer with custom strategies
    pub fn builder(config: ScoringConfig) -> RelevanceScorerBuilder {
        RelevanceScorerBuilder::new(config)
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Inverse-rank score: `1 / rank`
    ///
    /// Rank 1 scores 1.0, rank 100 scores 0.01. Ranks <= 0 are rejected.
    pub fn calculate_base_rank_score(&self, rank: i64) -> ScoringResult<f64> {
        if rank <= 0 {
            return Err(ScoringError::InvalidRank { rank });
        }
        Ok(1.0 / rank as f64)
    }

    /// Exponential time-decay score: `exp(-days_diff / decay_days)`
    ///
    /// `days_diff` is the whole number of days from the document timestamp to
    /// `reference_time` (now when `None`), floored. Future timestamps give a
    /// negative day count and a score above 1.0; the score is not clamped.
    pub fn calculate_recency_score<T: TimestampInput + ?Sized>(
        &self,
        timestamp: &T,
        reference_time: Option<NaiveDateTime>,
    ) -> ScoringResult<f64> {
        let document_time = timestamp.to_naive()?;
        let reference = reference_time.unwrap_or_else(now_reference);
        Ok(self.decay(days_between(reference, document_time)))
    }

    /// Weighted blend: `base_weight * base + recency_weight * recency`
    ///
    /// The blend is not normalized.
    pub fn calculate_relevance_score<T: TimestampInput + ?Sized>(
        &self,
        rank: i64,
        timestamp: &T,
        reference_time: Option<NaiveDateTime>,
    ) -> ScoringResult<f64> {
        let base = self.calculate_base_rank_score(rank)?;
        let recency = self.calculate_recency_score(timestamp, reference_time)?;
        Ok(self.blend(base, recency))
    }

    /// Compute the three rounded scores plus the engagement score for a
    /// document without copying it
    pub fn score_document(
        &self,
        document: &Document,
        reference_time: Option<NaiveDateTime>,
    ) -> ScoringResult<ScoreFields> {
        let timestamp = extract_timestamp(document)?;
        let rank = self.extract_rank(document)?;

        let reference = reference_time.unwrap_or_else(now_reference);
        let base = self.calculate_base_rank_score(rank)?;
        let recency = self.calculate_recency_score(timestamp, Some(reference))?;
        let relevance = self.blend(base, recency);

        Ok(ScoreFields {
            base_rank_score: round_score(base),
            recency_score: round_score(recency),
            relevance_score: round_score(relevance),
            user_engagement_score: self.engagement.engagement_score(document),
        })
    }

    /// Return a copy of `document` with the four score fields set
    ///
    /// The input is never modified. Existing score fields are overwritten, so
    /// enriching an enriched document with the same reference time reproduces
    /// the same values. Any validation error aborts this document only.
    pub fn enrich(
        &self,
        document: &Document,
        reference_time: Option<NaiveDateTime>,
    ) -> ScoringResult<Document> {
        let scores = self.score_document(document, reference_time)?;
        let mut enriched = document.clone();
        scores.apply_to(&mut enriched);
        Ok(enriched)
    }

    fn decay(&self, days_diff: i64) -> f64 {
        (-(days_diff as f64) / self.config.decay_days).exp()
    }

    fn blend(&self, base: f64, recency: f64) -> f64 {
        self.config.base_weight * base + self.config.recency_weight * recency
    }

    fn extract_rank(&self, document: &Document) -> ScoringResult<i64> {
        match document.get(fields::RANK) {
            None => self
                .config
                .assume_rank_when_missing
                .ok_or_else(|| ScoringError::MissingField {
                    field: fields::RANK.to_string(),
                }),
            Some(value) => value_as_rank(value).ok_or_else(|| ScoringError::InvalidFieldType {
                field: fields::RANK.to_string(),
                expected: "an integer".to_string(),
            }),
        }
    }
}

fn extract_timestamp(document: &Document) -> ScoringResult<&str> {
    match document.get(fields::TIMESTAMP) {
        None | Some(Value::Null) => Err(ScoringError::MissingField {
            field: fields::TIMESTAMP.to_string(),
        }),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ScoringError::InvalidFieldType {
            field: fields::TIMESTAMP.to_string(),
            expected: "an ISO-8601 date-time string".to_string(),
        }),
    }
}

fn value_as_rank(value: &Value) -> Option<i64> {
    if let Some(rank) = value.as_i64() {
        return Some(rank);
    }
    // Integral floats such as 3.0 are accepted
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

/// Builder for [`RelevanceScorer`]
pub struct RelevanceScorerBuilder {
    config: ScoringConfig,
    engagement: Option<Arc<dyn EngagementSignal>>,
    weight_warning_hook: Option<WeightWarningHook>,
}

impl RelevanceScorerBuilder {
    /// Start from a configuration
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            engagement: None,
            weight_warning_hook: None,
        }
    }

    /// Use a custom engagement strategy instead of the configured constant
    pub fn engagement<E: EngagementSignal + 'static>(mut self, signal: E) -> Self {
        self.engagement = Some(Arc::new(signal));
        self
    }

    /// Replace the default weight warning hook (a `tracing` warning)
    pub fn on_weight_warning<F>(mut self, hook: F) -> Self
    where
        F: Fn(&WeightWarning) + Send + Sync + 'static,
    {
        self.weight_warning_hook = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration and build the scorer
    pub fn build(self) -> ScoringResult<RelevanceScorer> {
        self.config.validate()?;

        if let Some(warning) = self.config.weight_warning() {
            match &self.weight_warning_hook {
                Some(hook) => hook(&warning),
                None => tracing::warn!(
                    base_weight = warning.base_weight,
                    recency_weight = warning.recency_weight,
                    sum = warning.sum,
                    "{}",
                    warning
                ),
            }
        }

        let engagement = self
            .engagement
            .unwrap_or_else(|| Arc::new(ConstantEngagement(self.config.default_engagement)));

        Ok(RelevanceScorer {
            config: self.config,
            engagement,
        })
    }
}
