//! Relevance scoring configuration
//!
//! This module holds the weights and decay parameters that drive the
//! [`RelevanceScorer`](super::RelevanceScorer).

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// Tolerance used when checking whether the two weights sum to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration for relevance scoring
///
/// The two weights are applied to the rank-derived score and the recency
/// score respectively. They are not required to sum to 1.0; a scorer built
/// from weights that do not reports a [`WeightWarning`] through its warning
/// hook instead of failing.
///
/// # Example
///
/// ```
/// use serprank::scoring::ScoringConfig;
///
/// let config = ScoringConfig {
///     decay_days: 7.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight applied to the inverse-rank score. Default: 0.6
    pub base_weight: f64,

    /// Weight applied to the time-decay score. Default: 0.4
    pub recency_weight: f64,

    /// Characteristic decay period in days, must be > 0. Default: 30
    pub decay_days: f64,

    /// Constant engagement score written to every enriched document, in [0, 1].
    /// Default: 0.5
    pub default_engagement: f64,

    /// Rank assumed for documents that carry no `rank` field.
    ///
    /// `None` turns a missing rank into a `MissingField` failure. Default: `Some(1)`
    pub assume_rank_when_missing: Option<i64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_weight: 0.6,
            recency_weight: 0.4,
            decay_days: 30.0,
            default_engagement: 0.5,
            assume_rank_when_missing: Some(1),
        }
    }
}

impl ScoringConfig {
    /// Create a new scoring configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with the given weights and decay period, keeping the
    /// remaining defaults
    pub fn with_weights(base_weight: f64, recency_weight: f64, decay_days: f64) -> Self {
        Self {
            base_weight,
            recency_weight,
            decay_days,
            ..Default::default()
        }
    }

    /// Require every document to carry an explicit rank
    pub fn strict_rank(mut self) -> Self {
        self.assume_rank_when_missing = None;
        self
    }

    /// Sum of the two blend weights
    pub fn weight_sum(&self) -> f64 {
        self.base_weight + self.recency_weight
    }

    /// Return a [`WeightWarning`] when the weights do not sum to 1.0
    pub fn weight_warning(&self) -> Option<WeightWarning> {
        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            Some(WeightWarning {
                base_weight: self.base_weight,
                recency_weight: self.recency_weight,
                sum,
            })
        } else {
            None
        }
    }

    /// Validate the configuration
    ///
    /// Returns an error if any parameters are invalid:
    /// - weights must be finite and >= 0.0
    /// - decay_days must be finite and > 0.0
    /// - default_engagement must lie in [0.0, 1.0]
    /// - assume_rank_when_missing, when set, must be >= 1
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.base_weight.is_finite() || self.base_weight < 0.0 {
            return Err(ScoringError::InvalidConfig(
                "base_weight must be a finite value >= 0.0".to_string(),
            ));
        }
        if !self.recency_weight.is_finite() || self.recency_weight < 0.0 {
            return Err(ScoringError::InvalidConfig(
                "recency_weight must be a finite value >= 0.0".to_string(),
            ));
        }
        if !self.decay_days.is_finite() || self.decay_days <= 0.0 {
            return Err(ScoringError::InvalidConfig(
                "decay_days must be a finite value > 0.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.default_engagement) {
            return Err(ScoringError::InvalidConfig(
                "default_engagement must be within [0.0, 1.0]".to_string(),
            ));
        }
        if let Some(rank) = self.assume_rank_when_missing
            && rank <= 0
        {
            return Err(ScoringError::InvalidConfig(format!(
                "assume_rank_when_missing must be >= 1, got {}",
                rank
            )));
        }

        Ok(())
    }
}

/// Raised when the configured weights do not sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightWarning {
    /// Configured base weight
    pub base_weight: f64,
    /// Configured recency weight
    pub recency_weight: f64,
    /// Their sum
    pub sum: f64,
}

impl std::fmt::Display for WeightWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "scoring weights sum to {} (base_weight={}, recency_weight={}); relevance scores are not normalized",
            self.sum, self.base_weight, self.recency_weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.base_weight, 0.6);
        assert_eq!(config.recency_weight, 0.4);
        assert_eq!(config.decay_days, 30.0);
        assert_eq!(config.default_engagement, 0.5);
        assert_eq!(config.assume_rank_when_missing, Some(1));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_decay_days() {
        let config = ScoringConfig {
            decay_days: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScoringError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_nan_decay_days() {
        let config = ScoringConfig {
            decay_days: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_weight() {
        let config = ScoringConfig {
            recency_weight: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_engagement_out_of_range() {
        let config = ScoringConfig {
            default_engagement: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_assumed_rank() {
        let config = ScoringConfig {
            assume_rank_when_missing: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(ScoringConfig::default().strict_rank().validate().is_ok());
    }

    #[test]
    fn test_unnormalized_weights_are_valid() {
        let config = ScoringConfig::with_weights(2.0, 3.0, 10.0);
        assert!(config.validate().is_ok());

        let warning = config.weight_warning().expect("weights do not sum to one");
        assert_eq!(warning.sum, 5.0);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(ScoringConfig::default().weight_warning().is_none());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = ScoringConfig::with_weights(0.7, 0.3, 14.0).strict_rank();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScoringConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"decay_days": 7}"#).unwrap();
        assert_eq!(config.decay_days, 7.0);
        assert_eq!(config.base_weight, 0.6);
    }
}
