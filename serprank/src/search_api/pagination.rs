//! Paginated result fetching and SerpAPI-to-hit conversion

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::client::PageFetcher;
use super::errors::{SearchApiError, SearchApiResult};
use crate::models::RawHit;

/// Fetch up to `num_pages` pages of results for `query`
///
/// Inline videos on the first page come before the organic results. Positions
/// are 1-indexed and keep counting across pages. Pagination stops early on an
/// API error payload, an empty page, or a failed request; only a run that
/// yields nothing at all is an error.
pub async fn fetch_results<F: PageFetcher + ?Sized>(
    fetcher: &F,
    query: &str,
    num_pages: usize,
    per_page: usize,
) -> SearchApiResult<Vec<RawHit>> {
    let mut hits = Vec::new();
    let mut position = 1;

    for page in 0..num_pages {
        let start = page * per_page;
        debug!("Fetching page {} (start={})", page + 1, start);

        let response = match fetcher.fetch_page(query, start, per_page).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching page {}: {}", page + 1, e);
                break;
            }
        };

        if let Some(error) = response.get("error") {
            warn!("Search API error: {}", error);
            break;
        }

        let organic = array_field(&response, "organic_results");
        let inline_videos = array_field(&response, "inline_videos");

        if organic.is_empty() && inline_videos.is_empty() {
            debug!("No more results at page {}", page + 1);
            break;
        }

        debug!(
            "Found {} organic results and {} inline videos",
            organic.len(),
            inline_videos.len()
        );

        if page == 0 {
            for video in inline_videos {
                hits.push(convert_inline_video(video, position));
                position += 1;
            }
        }

        for result in organic {
            hits.push(convert_organic_result(result, position));
            position += 1;
        }
    }

    if hits.is_empty() {
        return Err(SearchApiError::NoResults {
            query: query.to_string(),
        });
    }

    info!("Fetched {} results for '{}'", hits.len(), query);
    Ok(hits)
}

/// Convert an organic result into a hit
///
/// Results flagged as videos by the engine get a `videoobject` entry.
pub fn convert_organic_result(result: &Value, position: usize) -> RawHit {
    let mut pagemap = Map::new();

    let is_video = result
        .pointer("/rich_snippet/top/detected_extensions/video")
        .is_some_and(truthy);
    if is_video {
        pagemap.insert("videoobject".to_string(), video_object(result));
    }

    pagemap.insert(
        "metatags".to_string(),
        json!([{
            "og:image": result.get("thumbnail").cloned().unwrap_or(Value::Null),
            "author": result.get("source").cloned().unwrap_or(Value::Null),
        }]),
    );

    build_hit(result, pagemap, position)
}

/// Convert an inline video into a hit
///
/// The author is the channel name when the channel is an object, otherwise
/// the result source.
pub fn convert_inline_video(video: &Value, position: usize) -> RawHit {
    let author = match video.get("channel") {
        Some(Value::Object(channel)) => channel.get("name").cloned().unwrap_or(Value::Null),
        _ => video.get("source").cloned().unwrap_or(Value::Null),
    };

    let mut pagemap = Map::new();
    pagemap.insert("videoobject".to_string(), video_object(video));
    pagemap.insert(
        "metatags".to_string(),
        json!([{
            "og:image": video.get("thumbnail").cloned().unwrap_or(Value::Null),
            "author": author,
        }]),
    );

    build_hit(video, pagemap, position)
}

fn video_object(result: &Value) -> Value {
    json!([{
        "name": str_field(result, "title").unwrap_or_default(),
        "description": str_field(result, "snippet").unwrap_or_default(),
        "thumbnailurl": str_field(result, "thumbnail").unwrap_or_default(),
    }])
}

fn build_hit(result: &Value, pagemap: Map<String, Value>, position: usize) -> RawHit {
    RawHit {
        title: str_field(result, "title"),
        link: str_field(result, "link").unwrap_or_default(),
        snippet: str_field(result, "snippet"),
        pagemap,
        position,
    }
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
