//! Listing stored results

use std::collections::BTreeMap;

use serde::Serialize;

use super::PipelineResult;
use crate::models::{Category, Document, fields};
use crate::store::DocumentStore;

/// Stored results with per-category counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewSummary {
    /// Matching documents ordered by rank
    pub documents: Vec<Document>,
    /// Document count per category
    pub categories: BTreeMap<String, usize>,
}

/// List up to `size` stored results, optionally filtered by query text and
/// category
pub async fn view_results<S: DocumentStore + ?Sized>(
    store: &S,
    query: Option<&str>,
    category: Option<Category>,
    size: usize,
) -> PipelineResult<ViewSummary> {
    let documents = store.search(query, category, size).await?;

    let mut categories = BTreeMap::new();
    for document in &documents {
        let category = document.get_str(fields::CATEGORY).unwrap_or("unknown");
        *categories.entry(category.to_string()).or_insert(0) += 1;
    }

    Ok(ViewSummary {
        documents,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn doc(query: &str, category: &str, rank: i64) -> Document {
        Document::new()
            .with("query", query)
            .with("category", category)
            .with("rank", rank)
    }

    #[tokio::test]
    async fn test_view_counts_categories() {
        let store = InMemoryStore::with_documents([
            ("1", doc("rust", "video", 1)),
            ("2", doc("rust", "article", 1)),
            ("3", doc("rust", "article", 2)),
            ("4", doc("go", "article", 1)),
        ]);

        let all = view_results(&store, None, None, 100).await.unwrap();
        assert_eq!(all.documents.len(), 4);
        assert_eq!(all.categories.get("article"), Some(&3));

        let rust_articles = view_results(&store, Some("rust"), Some(Category::Article), 100)
            .await
            .unwrap();
        assert_eq!(rust_articles.documents.len(), 2);
        assert_eq!(rust_articles.categories.len(), 1);
    }
}
