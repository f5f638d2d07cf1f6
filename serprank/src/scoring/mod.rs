//! Relevance scoring
//!
//! This module converts a search result's rank and timestamp into a relevance
//! score and enriches documents with the computed fields.
//!
//! # Overview
//!
//! Three related scores are produced:
//! - **base rank score**: `1 / rank`
//! - **recency score**: `exp(-days_diff / decay_days)`, where `days_diff` is
//!   the number of whole days between the document timestamp and a reference
//!   time
//! - **relevance score**: `base_weight * base + recency_weight * recency`
//!
//! Enrichment rounds all three to six decimal places and adds a
//! `user_engagement_score` from a pluggable [`EngagementSignal`].
//!
//! # Example
//!
//! ```
//! use serprank::scoring::{RelevanceScorer, ScoringConfig};
//!
//! let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
//! assert_eq!(scorer.calculate_base_rank_score(5).unwrap(), 0.2);
//! ```

pub mod config;
pub mod engagement;
pub mod error;
pub mod scorer;
pub mod timestamp;

pub use config::{ScoringConfig, WeightWarning};
pub use engagement::{ConstantEngagement, EngagementSignal};
pub use error::{ScoringError, ScoringResult};
pub use scorer::{RelevanceScorer, RelevanceScorerBuilder, WeightWarningHook, round_score};
pub use timestamp::{TimestampInput, days_between, now_reference, parse_timestamp};
