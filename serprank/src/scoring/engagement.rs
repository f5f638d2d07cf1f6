//! Engagement signal strategies
//!
//! Enrichment writes a `user_engagement_score` on every document. No real
//! engagement data is collected yet, so the default strategy returns the
//! configured constant. Other sources plug in through [`EngagementSignal`]
//! without touching the enrichment contract.

use std::fmt::Debug;

use crate::models::Document;

/// Source of the `user_engagement_score` written during enrichment
pub trait EngagementSignal: Send + Sync + Debug {
    /// Engagement score for a document, expected in [0, 1]
    fn engagement_score(&self, document: &Document) -> f64;
}

/// Returns the same score for every document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantEngagement(pub f64);

impl EngagementSignal for ConstantEngagement {
    fn engagement_score(&self, _document: &Document) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constant_ignores_document() {
        let signal = ConstantEngagement(0.5);
        let a = Document::from_value(json!({"rank": 1})).unwrap();
        let b = Document::from_value(json!({"rank": 99, "clicks": 1000})).unwrap();
        assert_eq!(signal.engagement_score(&a), 0.5);
        assert_eq!(signal.engagement_score(&b), 0.5);
    }
}
