//! In-process document store
//!
//! Implements the same contract as the REST store over a vector guarded by a
//! lock. Used for dry runs and tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::traits::{BulkSummary, DocumentStore, bulk_document_id};
use crate::models::{Category, Document, fields};

/// Document store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<Vec<(String, Document)>>,
    index_created: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that reports itself unreachable
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.unavailable.store(true, Ordering::SeqCst);
        store
    }

    /// Create a store seeded with documents under explicit ids
    pub fn with_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = (S, Document)>,
        S: Into<String>,
    {
        let seeded = documents
            .into_iter()
            .map(|(id, doc)| (id.into(), doc.without_id()))
            .collect();
        Self {
            documents: RwLock::new(seeded),
            index_created: AtomicBool::new(true),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Stored document by id, without its `_id` field
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.documents
            .read()
            .await
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, doc)| doc.clone())
    }

    async fn upsert(&self, id: String, document: Document) {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            Some((_, existing)) => *existing = document,
            None => documents.push((id, document)),
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Connection("in-memory store marked unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn index_name(&self) -> &str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }

    async fn index_exists(&self) -> StoreResult<bool> {
        self.check_available()?;
        Ok(self.index_created.load(Ordering::SeqCst))
    }

    async fn ensure_index(&self) -> StoreResult<bool> {
        self.check_available()?;
        Ok(!self.index_created.swap(true, Ordering::SeqCst))
    }

    async fn bulk_index(&self, documents: &[Document]) -> StoreResult<BulkSummary> {
        self.check_available()?;
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let ids = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| {
                bulk_document_id(doc, position)
                    .map_err(|reason| StoreError::InvalidDocument { index: position, reason })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        self.index_created.store(true, Ordering::SeqCst);
        for (id, document) in ids.into_iter().zip(documents) {
            self.upsert(id, document.without_id()).await;
        }

        Ok(BulkSummary {
            indexed: documents.len(),
            ..Default::default()
        })
    }

    async fn search(
        &self,
        query: Option<&str>,
        category: Option<Category>,
        size: usize,
    ) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let terms = query.map(tokens);

        let documents = self.documents.read().await;
        let mut matches: Vec<Document> = documents
            .iter()
            .filter(|(_, doc)| match &terms {
                Some(terms) => {
                    let doc_terms = tokens(doc.get_str(fields::QUERY).unwrap_or_default());
                    terms.iter().any(|t| doc_terms.contains(t))
                }
                None => true,
            })
            .filter(|(_, doc)| {
                category.is_none_or(|c| doc.get_str(fields::CATEGORY) == Some(c.as_str()))
            })
            .map(|(id, doc)| doc.clone().with(fields::ID, id.as_str()))
            .collect();

        matches.sort_by_key(|doc| doc.get(fields::RANK).and_then(Value::as_i64).unwrap_or(i64::MAX));
        matches.truncate(size);
        Ok(matches)
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .map(|(id, doc)| doc.clone().with(fields::ID, id.as_str()))
            .collect())
    }

    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> StoreResult<()> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        let (_, document) = documents
            .iter_mut()
            .find(|(doc_id, _)| doc_id == id)
            .ok_or_else(|| StoreError::NotFound(format!("document {}", id)))?;
        for (key, value) in fields {
            document.insert(key, value);
        }
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        self.check_available()?;
        Ok(self.documents.read().await.len())
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(query: &str, category: &str, rank: i64) -> Document {
        Document::new()
            .with("query", query)
            .with("category", category)
            .with("rank", rank)
            .with("title", format!("{category} {rank}"))
    }

    #[tokio::test]
    async fn test_bulk_index_and_fetch_all() {
        let store = InMemoryStore::new();
        assert!(!store.index_exists().await.unwrap());
        assert!(store.ensure_index().await.unwrap());
        assert!(!store.ensure_index().await.unwrap());

        let summary = store
            .bulk_index(&[doc("rust", "video", 1), doc("rust", "article", 1)])
            .await
            .unwrap();
        assert_eq!(summary.indexed, 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all[0].id(), Some("rust_video_1_0"));
        assert_eq!(all[1].id(), Some("rust_article_1_1"));
    }

    #[tokio::test]
    async fn test_bulk_index_empty_is_noop() {
        let store = InMemoryStore::new();
        assert_eq!(store.bulk_index(&[]).await.unwrap(), BulkSummary::default());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_filters_and_sorts() {
        let store = InMemoryStore::new();
        store
            .bulk_index(&[
                doc("rust tutorial", "article", 3),
                doc("rust tutorial", "video", 2),
                doc("rust tutorial", "article", 1),
                doc("python basics", "article", 1),
            ])
            .await
            .unwrap();

        let articles = store
            .search(Some("Rust"), Some(Category::Article), 10)
            .await
            .unwrap();
        let ranks: Vec<_> = articles.iter().map(|d| d.get("rank").cloned()).collect();
        assert_eq!(ranks, vec![Some(json!(1)), Some(json!(3))]);

        assert_eq!(articles[0].id(), Some("rust tutorial_article_1_2"));

        let limited = store.search(Some("tutorial"), None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);

        let everything = store.search(None, None, 10).await.unwrap();
        assert_eq!(everything.len(), 4);
    }

    #[tokio::test]
    async fn test_update_fields() {
        let store = InMemoryStore::with_documents([("a", doc("q", "video", 1))]);
        let mut fields = Map::new();
        fields.insert("relevance_score".to_string(), json!(0.9));

        store.update_fields("a", fields.clone()).await.unwrap();
        assert_eq!(
            store.get("a").await.unwrap().get_f64("relevance_score"),
            Some(0.9)
        );

        assert!(matches!(
            store.update_fields("missing", fields).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = InMemoryStore::unavailable();
        assert!(!store.ping().await.unwrap());
        assert!(store.fetch_all().await.is_err());
    }
}
