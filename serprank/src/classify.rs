//! Search-hit classification and structuring
//!
//! Routes raw hits into video and article buckets from their pagemap metadata
//! and turns them into index-ready [`Document`]s.

use chrono::{DateTime, Timelike, Utc};
use serde_json::{Map, Value};

use crate::models::{Category, Document, RawHit, fields};

/// Pagemap keys that mark a hit as an article
pub const ARTICLE_MARKERS: &[&str] = &["article", "blogposting", "newsarticle"];

/// Pagemap key that marks a hit as a video
pub const VIDEO_MARKER: &str = "videoobject";

/// Source recorded on every structured document
pub const DEFAULT_SOURCE: &str = "google";

/// Title used when a hit has none
pub const DEFAULT_TITLE: &str = "No title available";

/// Description used when a hit has no snippet
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Hits split by category, original order kept within each bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedResults {
    /// Video hits
    pub videos: Vec<RawHit>,
    /// Article and unclassified hits
    pub articles: Vec<RawHit>,
}

impl CategorizedResults {
    /// Total number of hits
    pub fn len(&self) -> usize {
        self.videos.len() + self.articles.len()
    }

    /// Whether both buckets are empty
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.articles.is_empty()
    }
}

/// Classify a hit by its pagemap, `None` when nothing marks it
pub fn classify_item(hit: &RawHit) -> Option<Category> {
    if hit.has_pagemap(VIDEO_MARKER) {
        return Some(Category::Video);
    }
    if ARTICLE_MARKERS.iter().any(|marker| hit.has_pagemap(marker)) {
        return Some(Category::Article);
    }
    None
}

/// Split hits into videos and articles
///
/// Unclassified hits are treated as generic web pages and land in articles.
pub fn categorize_results(hits: impl IntoIterator<Item = RawHit>) -> CategorizedResults {
    let mut categorized = CategorizedResults::default();
    for hit in hits {
        match classify_item(&hit) {
            Some(Category::Video) => categorized.videos.push(hit),
            Some(Category::Article) | None => categorized.articles.push(hit),
        }
    }
    categorized
}

/// Build a document from a hit
///
/// Title and description fall back to placeholders only when the hit has
/// none at all; an empty string is kept as is.
pub fn structure_document(
    hit: &RawHit,
    query: &str,
    category: Category,
    rank: usize,
    fetched_at: DateTime<Utc>,
) -> Document {
    let title = hit.title.as_deref().unwrap_or(DEFAULT_TITLE);
    let description = hit.snippet.as_deref().unwrap_or(DEFAULT_DESCRIPTION);

    let mut document = Document::new()
        .with(fields::QUERY, query)
        .with(fields::CATEGORY, category.as_str())
        .with(fields::TITLE, title)
        .with(fields::URL, hit.link.as_str())
        .with(fields::DESCRIPTION, description)
        .with(fields::SOURCE, DEFAULT_SOURCE)
        .with(fields::RANK, rank)
        .with(fields::TIMESTAMP, format_fetch_time(fetched_at));

    if let Some(thumbnail) = thumbnail_url(hit) {
        document.insert(fields::THUMBNAIL_URL, thumbnail);
    }
    if let Some(author) = author(hit) {
        document.insert(fields::AUTHOR, author);
    }
    document
}

/// Structure every hit: videos first, then articles, ranks 1-indexed per category
pub fn structure_results(
    categorized: &CategorizedResults,
    query: &str,
    fetched_at: DateTime<Utc>,
) -> Vec<Document> {
    let videos = categorized
        .videos
        .iter()
        .enumerate()
        .map(|(i, hit)| structure_document(hit, query, Category::Video, i + 1, fetched_at));
    let articles = categorized
        .articles
        .iter()
        .enumerate()
        .map(|(i, hit)| structure_document(hit, query, Category::Article, i + 1, fetched_at));
    videos.chain(articles).collect()
}

/// UTC ISO-8601 with a `Z` suffix, microseconds only when non-zero
pub fn format_fetch_time(at: DateTime<Utc>) -> String {
    if at.nanosecond() / 1_000 == 0 {
        at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

fn thumbnail_url(hit: &RawHit) -> Option<String> {
    // An imageobject entry wins outright, even without a usable url
    if hit.has_pagemap("imageobject") {
        return hit
            .pagemap_first("imageobject")
            .and_then(|image| string_field(image, "url"));
    }
    let metatags = hit.pagemap_first("metatags")?;
    first_string(metatags, &["og:image", "twitter:image"])
}

fn author(hit: &RawHit) -> Option<String> {
    let metatags = hit.pagemap_first("metatags")?;
    first_string(metatags, &["article:author", "author", "og:site_name"])
}

fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string_field(map, key))
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .and_then(non_empty)
        .map(str::to_string)
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}
