//! Document record flowing through classification, scoring and export

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known document field names
pub mod fields {
    /// Store-assigned identity, present on documents read back from the store
    pub const ID: &str = "_id";
    /// Original search query
    pub const QUERY: &str = "query";
    /// `video` or `article`
    pub const CATEGORY: &str = "category";
    /// Result title
    pub const TITLE: &str = "title";
    /// Result URL
    pub const URL: &str = "url";
    /// Result snippet
    pub const DESCRIPTION: &str = "description";
    /// Search engine the result came from
    pub const SOURCE: &str = "source";
    /// 1-indexed position
    pub const RANK: &str = "rank";
    /// ISO-8601 creation time
    pub const TIMESTAMP: &str = "timestamp";
    /// Thumbnail image URL
    pub const THUMBNAIL_URL: &str = "thumbnailUrl";
    /// Author or site name
    pub const AUTHOR: &str = "author";
    /// Inverse-rank score
    pub const BASE_RANK_SCORE: &str = "base_rank_score";
    /// Time-decay score
    pub const RECENCY_SCORE: &str = "recency_score";
    /// Weighted blend of the two
    pub const RELEVANCE_SCORE: &str = "relevance_score";
    /// Engagement placeholder
    pub const USER_ENGAGEMENT_SCORE: &str = "user_engagement_score";

    /// Fields written by enrichment
    pub const SCORE_FIELDS: &[&str] = &[
        BASE_RANK_SCORE,
        RECENCY_SCORE,
        RELEVANCE_SCORE,
        USER_ENGAGEMENT_SCORE,
    ];
}

/// A search-result record with arbitrary pass-through fields
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value, returning `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get a numeric field as f64
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// Whether the field is present (a JSON null counts as present)
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a field
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Store-assigned identity
    pub fn id(&self) -> Option<&str> {
        self.get_str(fields::ID)
    }

    /// Copy of this document without its store identity
    pub fn without_id(&self) -> Self {
        let mut copy = self.clone();
        copy.remove(fields::ID);
        copy
    }

    /// Score fields, if the document has been enriched
    pub fn scores(&self) -> Option<ScoreFields> {
        Some(ScoreFields {
            base_rank_score: self.get_f64(fields::BASE_RANK_SCORE)?,
            recency_score: self.get_f64(fields::RECENCY_SCORE)?,
            relevance_score: self.get_f64(fields::RELEVANCE_SCORE)?,
            user_engagement_score: self.get_f64(fields::USER_ENGAGEMENT_SCORE)?,
        })
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into the underlying JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Convert into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}

/// The four fields written by enrichment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreFields {
    /// `1 / rank`
    pub base_rank_score: f64,
    /// `exp(-days / decay_days)`
    pub recency_score: f64,
    /// Weighted blend of the two
    pub relevance_score: f64,
    /// Engagement placeholder
    pub user_engagement_score: f64,
}

impl ScoreFields {
    /// Write (or overwrite) the score fields on a document
    pub fn apply_to(&self, document: &mut Document) {
        for (key, value) in self.to_map() {
            document.insert(key, value);
        }
    }

    /// Score fields as a partial-update body
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(fields::BASE_RANK_SCORE.to_string(), self.base_rank_score.into());
        map.insert(fields::RECENCY_SCORE.to_string(), self.recency_score.into());
        map.insert(fields::RELEVANCE_SCORE.to_string(), self.relevance_score.into());
        map.insert(
            fields::USER_ENGAGEMENT_SCORE.to_string(),
            self.user_engagement_score.into(),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(Document::from_value(json!({"a": 1})).is_some());
        assert!(Document::from_value(json!([1, 2])).is_none());
        assert!(Document::from_value(json!("text")).is_none());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let doc = Document::new().with("rank", 3).with("title", "Rust");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({"rank": 3, "title": "Rust"}));
    }

    #[test]
    fn test_without_id() {
        let doc = Document::new().with("_id", "abc").with("rank", 1);
        assert_eq!(doc.id(), Some("abc"));

        let stripped = doc.without_id();
        assert_eq!(stripped.id(), None);
        assert_eq!(stripped.len(), 1);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_scores_roundtrip() {
        let scores = ScoreFields {
            base_rank_score: 0.5,
            recency_score: 0.25,
            relevance_score: 0.4,
            user_engagement_score: 0.5,
        };
        let mut doc = Document::new().with("rank", 2);
        assert!(doc.scores().is_none());

        scores.apply_to(&mut doc);
        assert_eq!(doc.scores(), Some(scores));
        assert_eq!(doc.len(), 5);
    }
}
