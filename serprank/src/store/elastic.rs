//! Elasticsearch-compatible REST store

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::errors::{StoreError, StoreResult, is_retryable_status};
use super::retry::RetryPolicy;
use super::traits::{BulkSummary, DocumentStore, bulk_document_id};
use crate::config::StoreConfig;
use crate::models::{Category, Document, fields};

/// Index mapping for result documents
///
/// Shard and replica settings are only sent to local deployments; hosted
/// deployments manage them.
pub fn index_mapping(cloud: bool) -> Value {
    let mut body = json!({
        "mappings": {
            "properties": {
                "query": {"type": "text", "analyzer": "standard"},
                "category": {"type": "keyword"},
                "title": {"type": "text", "analyzer": "standard"},
                "url": {"type": "keyword"},
                "description": {"type": "text", "analyzer": "standard"},
                "source": {"type": "keyword"},
                "rank": {"type": "integer"},
                "thumbnailUrl": {"type": "keyword"},
                "author": {"type": "text"},
                "timestamp": {"type": "date"}
            }
        }
    });
    if !cloud {
        body["settings"] = json!({
            "number_of_shards": 1,
            "number_of_replicas": 0
        });
    }
    body
}

/// Search request body: match on query text, optional category filter, rank order
pub fn search_body(query: Option<&str>, category: Option<Category>, size: usize) -> Value {
    let matcher = match query {
        Some(text) => json!({"match": {"query": text}}),
        None => json!({"match_all": {}}),
    };
    let mut body = json!({
        "query": {
            "bool": {
                "must": [matcher]
            }
        },
        "size": size,
        "sort": [{"rank": {"order": "asc"}}]
    });
    if let Some(category) = category {
        body["query"]["bool"]["filter"] = json!([
            {"term": {"category": category.as_str()}}
        ]);
    }
    body
}

#[derive(Debug)]
struct RawResponse {
    status: u16,
    body: String,
}

impl RawResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn into_json(self, what: &str) -> StoreResult<Value> {
        if self.status == 404 {
            return Err(StoreError::NotFound(what.to_string()));
        }
        if !self.is_success() {
            return Err(StoreError::Http {
                status: self.status,
                body: truncate(&self.body),
            });
        }
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Document store backed by an Elasticsearch REST endpoint
#[derive(Debug, Clone)]
pub struct ElasticStore {
    client: reqwest::Client,
    base_url: Url,
    index: String,
    api_key: Option<String>,
    cloud: bool,
    retry: RetryPolicy,
    scroll_page_size: usize,
    scroll_keep_alive: String,
}

impl ElasticStore {
    /// Create a store client from configuration
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            StoreError::Configuration(format!("Invalid store URL '{}': {}", config.url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Configuration(format!(
                "Store URL cannot be used as a base: {}",
                config.url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("serprank/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let cloud = config.is_cloud_deployment();
        debug!(
            "Store client for {} (index={}, cloud={})",
            base_url, config.index, cloud
        );

        Ok(Self {
            client,
            base_url,
            index: config.index.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            cloud,
            retry: RetryPolicy::with_max_retries(config.max_retries),
            scroll_page_size: config.scroll_page_size,
            scroll_keep_alive: config.scroll_keep_alive.clone(),
        })
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Index name
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Whether the client treats the endpoint as a hosted deployment
    pub fn is_cloud(&self) -> bool {
        self.cloud
    }

    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                StoreError::Configuration(format!("Store URL cannot be a base: {}", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("ApiKey {}", key)),
            None => request,
        }
    }

    async fn send<F>(&self, what: &str, build: F) -> StoreResult<RawResponse>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        self.retry
            .run(what, || {
                let request = self.authorize(build(&self.client));
                async move {
                    let response = request.send().await?;
                    let status = response.status().as_u16();
                    let body = response.text().await?;
                    if is_retryable_status(status) {
                        return Err(StoreError::Http {
                            status,
                            body: truncate(&body),
                        });
                    }
                    Ok(RawResponse { status, body })
                }
            })
            .await
    }

    async fn scroll_page(&self, scroll_id: &str) -> StoreResult<Value> {
        let url = self.endpoint(&["_search", "scroll"])?;
        let body = json!({"scroll": self.scroll_keep_alive, "scroll_id": scroll_id});
        self.send("scroll", |c| c.post(url.clone()).json(&body))
            .await?
            .into_json("scroll context")
    }

    async fn clear_scroll(&self, scroll_id: &str) {
        let url = match self.endpoint(&["_search", "scroll"]) {
            Ok(url) => url,
            Err(e) => {
                warn!("Failed to clear scroll context: {}", e);
                return;
            }
        };
        let body = json!({"scroll_id": [scroll_id]});
        if let Err(e) = self.send("clear scroll", |c| c.delete(url.clone()).json(&body)).await {
            warn!("Failed to clear scroll context: {}", e);
        }
    }
}

#[async_trait]
impl DocumentStore for ElasticStore {
    fn index_name(&self) -> &str {
        &self.index
    }

    async fn ping(&self) -> StoreResult<bool> {
        let url = self.endpoint(&[])?;
        match self.send("ping", |c| c.get(url.clone())).await {
            Ok(response) => Ok(response.is_success()),
            Err(e) if e.is_retryable() => {
                warn!("Store ping failed: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn index_exists(&self) -> StoreResult<bool> {
        let url = self.endpoint(&[self.index.as_str()])?;
        let response = self.send("index exists", |c| c.head(url.clone())).await?;
        match response.status {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(StoreError::Http {
                status,
                body: truncate(&response.body),
            }),
        }
    }

    async fn ensure_index(&self) -> StoreResult<bool> {
        if self.index_exists().await? {
            debug!("Index already exists: {}", self.index);
            return Ok(false);
        }

        let url = self.endpoint(&[self.index.as_str()])?;
        let mapping = index_mapping(self.cloud);
        let response = self
            .send("create index", |c| c.put(url.clone()).json(&mapping))
            .await?;

        if response.status == 400 && response.body.contains("resource_already_exists_exception") {
            return Ok(false);
        }
        response.into_json("index")?;
        info!("Created index: {}", self.index);
        Ok(true)
    }

    async fn bulk_index(&self, documents: &[Document]) -> StoreResult<BulkSummary> {
        if documents.is_empty() {
            debug!("No documents to index");
            return Ok(BulkSummary::default());
        }

        let mut payload = String::new();
        for (position, document) in documents.iter().enumerate() {
            let id = bulk_document_id(document, position)
                .map_err(|reason| StoreError::InvalidDocument { index: position, reason })?;
            let action = json!({"index": {"_index": self.index, "_id": id}});
            payload.push_str(&serde_json::to_string(&action)?);
            payload.push('\n');
            payload.push_str(&serde_json::to_string(&document.without_id())?);
            payload.push('\n');
        }

        let url = self.endpoint(&["_bulk"])?;
        let response = self
            .send("bulk index", |c| {
                c.post(url.clone())
                    .header("Content-Type", "application/x-ndjson")
                    .body(payload.clone())
            })
            .await?
            .into_json("bulk endpoint")?;

        let summary = summarize_bulk_response(&response, documents.len());
        if summary.all_successful() {
            info!("Indexed {} documents", summary.indexed);
        } else {
            warn!(
                "Indexed {} documents, {} failed",
                summary.indexed, summary.failed
            );
            for error in &summary.errors {
                warn!("Failed item: {}", error);
            }
        }
        Ok(summary)
    }

    async fn search(
        &self,
        query: Option<&str>,
        category: Option<Category>,
        size: usize,
    ) -> StoreResult<Vec<Document>> {
        let url = self.endpoint(&[self.index.as_str(), "_search"])?;
        let body = search_body(query, category, size);
        let response = self
            .send("search", |c| c.post(url.clone()).json(&body))
            .await?
            .into_json(&self.index)?;

        Ok(hits(&response).iter().filter_map(document_with_id).collect())
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Document>> {
        let mut url = self.endpoint(&[self.index.as_str(), "_search"])?;
        url.query_pairs_mut()
            .append_pair("scroll", &self.scroll_keep_alive);
        let body = json!({"size": self.scroll_page_size, "query": {"match_all": {}}});

        let mut response = self
            .send("fetch all", |c| c.post(url.clone()).json(&body))
            .await?
            .into_json(&self.index)?;

        let mut documents = Vec::new();
        let mut scroll_id = scroll_id_of(&response)?;

        loop {
            let page = hits(&response);
            if page.is_empty() {
                break;
            }
            documents.extend(page.iter().filter_map(document_with_id));
            debug!("Fetched {} documents so far", documents.len());

            response = match self.scroll_page(&scroll_id).await {
                Ok(response) => response,
                Err(e) => {
                    self.clear_scroll(&scroll_id).await;
                    return Err(e);
                }
            };
            scroll_id = scroll_id_of(&response).unwrap_or(scroll_id);
        }

        self.clear_scroll(&scroll_id).await;
        info!("Fetched {} documents from {}", documents.len(), self.index);
        Ok(documents)
    }

    async fn update_fields(&self, id: &str, fields: Map<String, Value>) -> StoreResult<()> {
        let url = self.endpoint(&[self.index.as_str(), "_update", id])?;
        let body = json!({"doc": fields});
        self.send("update", |c| c.post(url.clone()).json(&body))
            .await?
            .into_json(&format!("document {}", id))?;
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        let url = self.endpoint(&[self.index.as_str(), "_count"])?;
        let response = self
            .send("count", |c| c.get(url.clone()))
            .await?
            .into_json(&self.index)?;
        response
            .get("count")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .ok_or_else(|| StoreError::Response("count response missing 'count'".to_string()))
    }
}

/// Tally a `_bulk` response
pub fn summarize_bulk_response(response: &Value, submitted: usize) -> BulkSummary {
    let Some(items) = response.get("items").and_then(Value::as_array) else {
        return BulkSummary {
            indexed: submitted,
            ..Default::default()
        };
    };

    let mut summary = BulkSummary::default();
    for item in items {
        let result = item
            .as_object()
            .and_then(|o| o.values().next())
            .unwrap_or(&Value::Null);
        let status = result.get("status").and_then(Value::as_u64).unwrap_or(0);
        match result.get("error") {
            Some(error) if !error.is_null() => {
                summary.failed += 1;
                let id = result.get("_id").and_then(Value::as_str).unwrap_or("unknown");
                summary.errors.push(format!("{}: {}", id, error));
            }
            _ if status >= 300 => {
                summary.failed += 1;
                summary.errors.push(format!("HTTP {}", status));
            }
            _ => summary.indexed += 1,
        }
    }
    summary
}

fn hits(response: &Value) -> &[Value] {
    response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn scroll_id_of(response: &Value) -> StoreResult<String> {
    response
        .get("_scroll_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::Response("search response missing '_scroll_id'".to_string()))
}

fn document_with_id(hit: &Value) -> Option<Document> {
    let mut document = hit.get("_source").cloned().and_then(Document::from_value)?;
    if let Some(id) = hit.get("_id").and_then(Value::as_str) {
        document.insert(fields::ID, id);
    }
    Some(document)
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mapping_settings_only_local() {
        let local = index_mapping(false);
        assert_eq!(local["settings"]["number_of_shards"], json!(1));
        assert_eq!(local["mappings"]["properties"]["rank"]["type"], json!("integer"));
        assert_eq!(
            local["mappings"]["properties"]["thumbnailUrl"]["type"],
            json!("keyword")
        );

        let cloud = index_mapping(true);
        assert!(cloud.get("settings").is_none());
    }

    #[test]
    fn test_search_body_category_filter() {
        let body = search_body(Some("rust"), Some(Category::Video), 5);
        assert_eq!(body["size"], json!(5));
        assert_eq!(
            body["query"]["bool"]["filter"][0]["term"]["category"],
            json!("video")
        );
        assert!(search_body(Some("rust"), None, 5)["query"]["bool"].get("filter").is_none());
        assert_eq!(
            search_body(None, None, 5)["query"]["bool"]["must"][0],
            json!({"match_all": {}})
        );
    }

    #[test]
    fn test_summarize_bulk_response() {
        let response = json!({
            "errors": true,
            "items": [
                {"index": {"_id": "a", "status": 201}},
                {"index": {"_id": "b", "status": 400, "error": {"type": "mapper_parsing_exception"}}},
                {"index": {"_id": "c", "status": 200}}
            ]
        });
        let summary = summarize_bulk_response(&response, 3);
        assert_eq!(summary.indexed, 2);
        assert_eq!(summary.failed, 1);
        assert!(summary.errors[0].starts_with("b:"));
    }

    #[test]
    fn test_document_with_id() {
        let hit = json!({"_id": "q_video_1_0", "_source": {"rank": 1}});
        let doc = document_with_id(&hit).unwrap();
        assert_eq!(doc.id(), Some("q_video_1_0"));
        assert_eq!(doc.get("rank"), Some(&json!(1)));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let config = StoreConfig {
            url: "http://localhost:9200/".to_string(),
            ..Default::default()
        };
        let store = ElasticStore::new(&config).unwrap();
        let url = store
            .endpoint(&["search_results", "_update", "rust async_video_1_0"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9200/search_results/_update/rust%20async_video_1_0"
        );
        assert!(!store.is_cloud());
    }

    #[test]
    fn test_cloud_detection() {
        let config = StoreConfig {
            url: "https://deploy.es.us-central1.gcp.cloud.es.io".to_string(),
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(ElasticStore::new(&config).unwrap().is_cloud());
    }

    #[test]
    fn test_invalid_url() {
        let config = StoreConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ElasticStore::new(&config),
            Err(StoreError::Configuration(_))
        ));
    }
}
