//! Query ingestion: search, classify, structure, index

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::PipelineResult;
use crate::classify::{categorize_results, structure_results};
use crate::search_api::{PageFetcher, fetch_results};
use crate::store::DocumentStore;

/// Counts from one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Query that was searched
    pub query: String,
    /// Hits classified as videos
    pub videos: usize,
    /// Hits classified as articles
    pub articles: usize,
    /// Documents the store accepted
    pub indexed: usize,
    /// Documents the store rejected
    pub failed: usize,
    /// Store messages for rejected documents
    pub errors: Vec<String>,
}

impl IngestSummary {
    /// Documents produced from the hits
    pub fn total(&self) -> usize {
        self.videos + self.articles
    }

    /// Whether every document was indexed
    pub fn all_indexed(&self) -> bool {
        self.failed == 0
    }
}

/// Search `query`, classify and structure the hits, and index them
///
/// Fails with [`SearchApiError::NoResults`](crate::search_api::SearchApiError::NoResults)
/// when the search yields nothing.
pub async fn process_query<F, S>(
    fetcher: &F,
    store: &S,
    query: &str,
    num_pages: usize,
    per_page: usize,
) -> PipelineResult<IngestSummary>
where
    F: PageFetcher + ?Sized,
    S: DocumentStore + ?Sized,
{
    process_query_at(fetcher, store, query, num_pages, per_page, Utc::now()).await
}

/// [`process_query`] with an explicit fetch time stamped on every document
pub async fn process_query_at<F, S>(
    fetcher: &F,
    store: &S,
    query: &str,
    num_pages: usize,
    per_page: usize,
    fetched_at: DateTime<Utc>,
) -> PipelineResult<IngestSummary>
where
    F: PageFetcher + ?Sized,
    S: DocumentStore + ?Sized,
{
    info!(query, num_pages, "Processing query");

    let hits = fetch_results(fetcher, query, num_pages, per_page).await?;
    let categorized = categorize_results(hits);
    info!(
        videos = categorized.videos.len(),
        articles = categorized.articles.len(),
        "Categorized results"
    );

    let documents = structure_results(&categorized, query, fetched_at);

    if store.ensure_index().await? {
        info!("Created results index");
    }
    let bulk = store.bulk_index(&documents).await?;
    if !bulk.all_successful() {
        warn!(failed = bulk.failed, "Some documents were not indexed");
    }
    info!(indexed = bulk.indexed, "Indexed documents");

    Ok(IngestSummary {
        query: query.to_string(),
        videos: categorized.videos.len(),
        articles: categorized.articles.len(),
        indexed: bulk.indexed,
        failed: bulk.failed,
        errors: bulk.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineError;
    use crate::search_api::SearchApiError;
    use crate::search_api::client::MockPageFetcher;
    use crate::store::InMemoryStore;
    use chrono::TimeZone;
    use mockall::predicate::{always, eq};
    use serde_json::json;

    fn page() -> serde_json::Value {
        json!({
            "inline_videos": [
                {"title": "Rust in 100 seconds", "link": "https://youtube.com/watch?v=1"}
            ],
            "organic_results": [
                {"title": "The Rust Book", "link": "https://doc.rust-lang.org/book", "snippet": "Learn Rust"},
                {"title": "Rust by Example", "link": "https://doc.rust-lang.org/rust-by-example"}
            ]
        })
    }

    #[tokio::test]
    async fn test_process_query_indexes_every_hit() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .with(eq("rust"), eq(0), always())
            .times(1)
            .returning(|_, _, _| Ok(page()));

        let store = InMemoryStore::new();
        let fetched_at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

        let summary = process_query_at(&fetcher, &store, "rust", 1, 10, fetched_at)
            .await
            .unwrap();

        assert_eq!(summary.videos, 1);
        assert_eq!(summary.articles, 2);
        assert_eq!(summary.indexed, 3);
        assert!(summary.all_indexed());

        let video = store.get("rust_video_1_0").await.unwrap();
        assert_eq!(video.get_str("timestamp"), Some("2024-01-15T10:30:00Z"));
        assert!(store.get("rust_article_2_2").await.is_some());
    }

    #[tokio::test]
    async fn test_process_query_without_results() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch_page()
            .returning(|_, _, _| Ok(json!({"organic_results": []})));

        let store = InMemoryStore::new();
        let result = process_query(&fetcher, &store, "nothing", 2, 10).await;

        assert!(matches!(
            result,
            Err(PipelineError::Search(SearchApiError::NoResults { .. }))
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
