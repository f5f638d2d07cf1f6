//! End-to-end pipeline tests against the in-memory store
//!
//! Ingest a canned search response, prepare training data from the store,
//! then verify and view the stored scores.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use serprank::export::{ExportFormat, PromptRecord, read_jsonl};
use serprank::models::Category;
use serprank::pipeline::{
    PipelineError, PreparePipeline, process_query_at, verify_scores, view_results,
};
use serprank::scoring::{RelevanceScorer, ScoringConfig};
use serprank::search_api::{PageFetcher, SearchApiResult};
use serprank::store::{DocumentStore, InMemoryStore};
use tempfile::TempDir;

/// Serves one page of results, then an empty page
struct CannedSearch;

#[async_trait]
impl PageFetcher for CannedSearch {
    async fn fetch_page(&self, _query: &str, start: usize, _num: usize) -> SearchApiResult<Value> {
        if start > 0 {
            return Ok(json!({"organic_results": []}));
        }
        Ok(json!({
            "inline_videos": [
                {
                    "title": "Async Rust in 15 minutes",
                    "link": "https://video.example/async",
                    "thumbnail": "https://img.example/async.jpg",
                    "channel": {"name": "Rustacean Station"}
                }
            ],
            "organic_results": [
                {
                    "title": "Asynchronous Programming in Rust",
                    "link": "https://rust-lang.github.io/async-book/",
                    "snippet": "The async book",
                    "source": "rust-lang.github.io"
                },
                {
                    "title": "Tokio tutorial",
                    "link": "https://tokio.rs/tokio/tutorial",
                    "snippet": "Learn tokio",
                    "rich_snippet": {"top": {"detected_extensions": {"video": true}}}
                },
                {
                    "title": "Async/await explained",
                    "link": "https://blog.example/async-await"
                }
            ]
        }))
    }
}

#[tokio::test]
async fn test_ingest_prepare_verify_view() {
    let store = InMemoryStore::new();
    let fetched_at = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();

    let ingest = process_query_at(&CannedSearch, &store, "async rust", 3, 10, fetched_at)
        .await
        .unwrap();
    assert_eq!(ingest.videos, 2);
    assert_eq!(ingest.articles, 2);
    assert_eq!(ingest.indexed, 4);
    assert_eq!(store.count().await.unwrap(), 4);

    let before = verify_scores(&store).await.unwrap();
    assert!(before.has_required_fields());
    assert!(!before.has_scores());

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("vertex_ready.jsonl");
    let reference = NaiveDate::from_ymd_opt(2024, 4, 11)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();

    let summary = PreparePipeline::new(scorer, &output)
        .with_format(ExportFormat::Prompt)
        .with_reference_time(reference)
        .run(&store)
        .await
        .unwrap();
    assert_eq!(summary.fetched, 4);
    assert_eq!(summary.scored, 4);
    assert_eq!(summary.updated, 4);
    assert_eq!(summary.exported, 4);

    let prompts: Vec<PromptRecord> = read_jsonl(&output).unwrap();
    assert_eq!(prompts.len(), 4);
    // Ten days old, rank 1: 0.6 + 0.4 * exp(-1/3)
    let top_video = prompts
        .iter()
        .find(|p| p.input_text.contains("title: Async Rust in 15 minutes"))
        .unwrap();
    assert!(top_video.input_text.contains("recency_score: 0.716531\n"));
    assert_eq!(top_video.output_text, "0.886613");

    let after = verify_scores(&store).await.unwrap();
    assert!(after.has_scores());

    let videos = view_results(&store, Some("rust"), Some(Category::Video), 10)
        .await
        .unwrap();
    assert_eq!(videos.documents.len(), 2);
    assert_eq!(videos.documents[0].get_str("author"), Some("Rustacean Station"));
    assert_eq!(videos.categories.get("video"), Some(&2));
}

#[tokio::test]
async fn test_prepare_requires_reachable_store() {
    let dir = TempDir::new().unwrap();
    let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
    let result = PreparePipeline::new(scorer, dir.path().join("out.jsonl"))
        .run(&InMemoryStore::unavailable())
        .await;
    assert!(matches!(result, Err(PipelineError::StoreUnavailable)));
}
