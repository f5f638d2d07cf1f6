//! Raw search hits and result categories

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Bucket a search hit is routed into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Video result (pagemap carries a `videoobject`)
    Video,
    /// Article or generic web page
    Article,
}

impl Category {
    /// Lowercase name as stored in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Article => "article",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" | "videos" => Ok(Self::Video),
            "article" | "articles" => Ok(Self::Article),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// A search result item as produced by the search-API fetcher
///
/// `pagemap` follows the Custom Search layout: each key (`videoobject`,
/// `metatags`, `imageobject`, ...) maps to an array of objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawHit {
    /// Result title, `None` when the search API sent none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Result URL
    pub link: String,
    /// Result snippet, `None` when the search API sent none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Structured metadata
    #[serde(default)]
    pub pagemap: Map<String, Value>,
    /// Global 1-indexed position across all fetched pages
    pub position: usize,
}

impl RawHit {
    /// First object stored under a pagemap key
    pub fn pagemap_first(&self, key: &str) -> Option<&Map<String, Value>> {
        self.pagemap
            .get(key)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_object)
    }

    /// Whether the pagemap carries a key
    pub fn has_pagemap(&self, key: &str) -> bool {
        self.pagemap.contains_key(key)
    }
}
