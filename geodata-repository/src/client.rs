//! Index client implementation.
//!
//! This module provides the main client for the geodata index. Application
//! code uses it to manage the index and to create and query documents.

use std::collections::BTreeSet;

use geodata_shared::IntoDocument;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{IndexClientConfig, DEFAULT_BULK_CHUNK_SIZE};
use crate::errors::IndexClientError;
use crate::interfaces::IndexProvider;
use crate::opensearch::{get_index_settings, queries, IndexConfig, OpenSearchProvider};
use crate::types::{BulkAction, BulkSummary, CreateAck};
use crate::utils::{generate_id, generate_prefix, sequential_id};

/// The main client for the geodata index.
///
/// Scoped to one index and one document type. Every method is a single
/// exchange with the search service (one request, or one request per bulk
/// chunk); nothing is retried and failures are returned as reported by the
/// service.
///
/// # Example
///
/// ```no_run
/// use geodata_repository::{IndexClient, IndexClientConfig};
/// use geodata_shared::{GeoDocument, GeoPoint};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IndexClient::connect(IndexClientConfig::default())?;
///
/// if !client.index_exists().await? {
///     client.create_index().await?;
/// }
///
/// let doc = GeoDocument::new("e23x", "1233", GeoPoint::new(40.713, -73.986), "32.4", "42");
/// let ack = client.create_document(doc).await?;
/// println!("created {}", ack.id);
/// # Ok(())
/// # }
/// ```
pub struct IndexClient {
    provider: Box<dyn IndexProvider>,
    config: IndexConfig,
    bulk_chunk_size: usize,
}

impl IndexClient {
    /// Create a new IndexClient over the given provider.
    ///
    /// # Arguments
    ///
    /// * `provider` - A boxed implementation of `IndexProvider` (e.g., `OpenSearchProvider`)
    /// * `config` - The index and document type to scope the client to
    pub fn new(provider: Box<dyn IndexProvider>, config: IndexConfig) -> Self {
        Self {
            provider,
            config,
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
        }
    }

    /// Create a new IndexClient with custom configuration.
    ///
    /// The configured URL is ignored; the provider already owns its connection.
    pub fn with_config(provider: Box<dyn IndexProvider>, config: IndexClientConfig) -> Self {
        Self {
            provider,
            config: config.index,
            bulk_chunk_size: config.bulk_chunk_size,
        }
    }

    /// Create a client connected to the configured URL through OpenSearch.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexClient)` - A client ready to send requests
    /// * `Err(IndexClientError)` - If the URL is invalid or the transport cannot be built
    pub fn connect(config: IndexClientConfig) -> Result<Self, IndexClientError> {
        let provider = OpenSearchProvider::new(&config.url)?;

        info!(
            url = %config.url,
            index = %config.index.index,
            doc_type = %config.index.doc_type,
            dialect = ?config.index.dialect,
            "Created index client"
        );

        Ok(Self::with_config(Box::new(provider), config))
    }

    /// The index configuration this client is scoped to.
    pub fn index_config(&self) -> &IndexConfig {
        &self.config
    }

    /// List the names of all indices known to the service.
    pub async fn list_indices(&self) -> Result<BTreeSet<String>, IndexClientError> {
        self.provider.list_indices().await
    }

    /// Returns true if the configured index exists.
    pub async fn index_exists(&self) -> Result<bool, IndexClientError> {
        Ok(self.list_indices().await?.contains(&self.config.index))
    }

    /// Create the configured index with the strict geodata mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The service's acknowledgment
    /// * `Err(IndexClientError::IndexAlreadyExists)` - If the index already exists
    /// * `Err(IndexClientError)` - If the service rejects the mapping or the request fails
    pub async fn create_index(&self) -> Result<Value, IndexClientError> {
        let body = get_index_settings(&self.config);
        self.provider.create_index(&self.config, &body).await
    }

    /// Get the service's mapping for the configured index and document type.
    pub async fn get_mapping(&self) -> Result<Value, IndexClientError> {
        self.provider.get_mapping(&self.config).await
    }

    /// Delete the configured index.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The service's acknowledgment
    /// * `Err(IndexClientError::IndexNotFound)` - If the index does not exist
    pub async fn delete_index(&self) -> Result<Value, IndexClientError> {
        self.provider.delete_index(&self.config).await
    }

    /// Create one document under a freshly generated identifier.
    ///
    /// # Returns
    ///
    /// * `Ok(CreateAck)` - The assigned identifier, version and shard information
    /// * `Err(IndexClientError::SerializationError)` - If the document is not a JSON object
    /// * `Err(IndexClientError)` - If the service rejects the document
    pub async fn create_document<D: IntoDocument>(
        &self,
        document: D,
    ) -> Result<CreateAck, IndexClientError> {
        let document = document.into_document()?;
        let id = generate_id();
        debug!(doc_id = %id, index = %self.config.index, "Creating document");

        self.provider
            .create_document(&self.config, &id, &document)
            .await
    }

    /// Index documents in bulk, each under its own random identifier.
    ///
    /// Documents rejected by the service are reported in the summary rather
    /// than failing the call. When a later chunk fails after earlier ones were
    /// written, its documents and all unsent ones are reported as failed.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Total, succeeded and failed counts with per-item results
    /// * `Err(IndexClientError)` - If a document cannot be serialized or the first request fails
    pub async fn create_document_multi<I, D>(
        &self,
        documents: I,
    ) -> Result<BulkSummary, IndexClientError>
    where
        I: IntoIterator<Item = D>,
        D: IntoDocument,
    {
        let actions = documents
            .into_iter()
            .map(|doc| -> Result<BulkAction, IndexClientError> {
                Ok(BulkAction::new(generate_id(), doc.into_document()?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.submit_bulk(actions).await
    }

    /// Index documents in bulk under ordered identifiers.
    ///
    /// A single prefix is generated for the batch and document `i` is stored
    /// as `{prefix}-{i:06}`, so identifiers follow input order.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Total, succeeded and failed counts with per-item results
    /// * `Err(IndexClientError)` - If a document cannot be serialized or the first request fails
    pub async fn create_document_multi_id<I, D>(
        &self,
        documents: I,
    ) -> Result<BulkSummary, IndexClientError>
    where
        I: IntoIterator<Item = D>,
        D: IntoDocument,
    {
        let prefix = generate_prefix();
        let actions = documents
            .into_iter()
            .enumerate()
            .map(|(i, doc)| -> Result<BulkAction, IndexClientError> {
                Ok(BulkAction::new(sequential_id(&prefix, i), doc.into_document()?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.submit_bulk(actions).await
    }

    /// Run a query body, passed through verbatim, against the configured
    /// index and document type. Returns the raw search response.
    pub async fn search(&self, query: &Value) -> Result<Value, IndexClientError> {
        self.provider.search(&self.config, query).await
    }

    /// Return every document of the index (a `match_all` search).
    pub async fn get_all(&self) -> Result<Value, IndexClientError> {
        self.search(&queries::match_all()).await
    }

    /// Send actions in chunks of `bulk_chunk_size` and merge the summaries.
    ///
    /// A failed request is an error only while nothing has been written. Once a
    /// chunk went through, a failing chunk and every chunk after it are
    /// recorded as failed items so the caller still learns what was stored.
    async fn submit_bulk(&self, actions: Vec<BulkAction>) -> Result<BulkSummary, IndexClientError> {
        if actions.is_empty() {
            return Ok(BulkSummary::empty());
        }

        if self.bulk_chunk_size == 0 {
            return Err(IndexClientError::validation(
                "bulk_chunk_size must be greater than zero",
            ));
        }

        let mut summary = BulkSummary::empty();
        for (sent, chunk) in actions.chunks(self.bulk_chunk_size).enumerate() {
            match self.provider.bulk_index(&self.config, chunk).await {
                Ok(chunk_summary) => summary.merge(chunk_summary),
                Err(e) if sent == 0 => return Err(e),
                Err(e) => {
                    let offset = sent * self.bulk_chunk_size;
                    error!(
                        index = %self.config.index,
                        written = summary.total,
                        unsent = actions.len() - offset,
                        error = %e,
                        "Bulk load aborted after a failed chunk"
                    );
                    summary.merge(BulkSummary::not_sent(&actions[offset..], &e));
                    break;
                }
            }
        }

        debug!(
            index = %self.config.index,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Bulk load finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BulkItemResult;
    use async_trait::async_trait;
    use geodata_shared::{Document, GeoDocument, GeoPoint};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Mock provider for testing
    #[derive(Default)]
    struct MockProvider {
        indices: BTreeSet<String>,
        created: Arc<Mutex<Vec<(String, Document)>>>,
        bulk_requests: Arc<Mutex<Vec<Vec<BulkAction>>>>,
        queries: Arc<Mutex<Vec<Value>>>,
        should_fail: bool,
        fail_bulk_call: Option<usize>,
    }

    #[async_trait]
    impl IndexProvider for MockProvider {
        async fn list_indices(&self) -> Result<BTreeSet<String>, IndexClientError> {
            if self.should_fail {
                return Err(IndexClientError::connection("Mock failure"));
            }
            Ok(self.indices.clone())
        }

        async fn create_index(
            &self,
            _config: &IndexConfig,
            body: &Value,
        ) -> Result<Value, IndexClientError> {
            Ok(json!({ "acknowledged": true, "body": body }))
        }

        async fn get_mapping(&self, config: &IndexConfig) -> Result<Value, IndexClientError> {
            let mut body = serde_json::Map::new();
            body.insert(config.index.clone(), json!({ "mappings": {} }));
            Ok(Value::Object(body))
        }

        async fn delete_index(&self, _config: &IndexConfig) -> Result<Value, IndexClientError> {
            Ok(json!({ "acknowledged": true }))
        }

        async fn create_document(
            &self,
            config: &IndexConfig,
            id: &str,
            document: &Document,
        ) -> Result<CreateAck, IndexClientError> {
            if self.should_fail {
                return Err(IndexClientError::connection("Mock failure"));
            }
            self.created
                .lock()
                .await
                .push((id.to_string(), document.clone()));
            Ok(CreateAck {
                index: config.index.clone(),
                doc_type: Some(config.doc_type.clone()),
                id: id.to_string(),
                version: Some(1),
                result: None,
                created: Some(true),
                shards: None,
            })
        }

        async fn bulk_index(
            &self,
            _config: &IndexConfig,
            actions: &[BulkAction],
        ) -> Result<BulkSummary, IndexClientError> {
            if self.should_fail {
                return Err(IndexClientError::connection("Mock failure"));
            }
            let mut bulk_requests = self.bulk_requests.lock().await;
            if self.fail_bulk_call == Some(bulk_requests.len()) {
                return Err(IndexClientError::connection("reset"));
            }
            bulk_requests.push(actions.to_vec());

            let results: Vec<BulkItemResult> = actions
                .iter()
                .map(|a| BulkItemResult {
                    id: a.id.clone(),
                    status: 201,
                    success: true,
                    error: None,
                })
                .collect();

            Ok(BulkSummary {
                total: actions.len(),
                succeeded: actions.len(),
                failed: 0,
                results,
            })
        }

        async fn search(
            &self,
            _config: &IndexConfig,
            query: &Value,
        ) -> Result<Value, IndexClientError> {
            self.queries.lock().await.push(query.clone());
            Ok(json!({ "hits": { "total": 0, "hits": [] } }))
        }
    }

    fn sample_doc(path_id: &str) -> GeoDocument {
        GeoDocument::new(
            path_id,
            "1233",
            GeoPoint::new(40.713, -73.986),
            "32.4",
            "42",
        )
    }

    #[tokio::test]
    async fn test_index_exists() {
        let provider = MockProvider {
            indices: ["geodata".to_string(), "other".to_string()].into(),
            ..Default::default()
        };
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        assert!(client.index_exists().await.unwrap());

        let provider = MockProvider {
            indices: ["other".to_string()].into(),
            ..Default::default()
        };
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        assert!(!client.index_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_index_exists_propagates_failure() {
        let provider = MockProvider {
            should_fail: true,
            ..Default::default()
        };
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let result = client.index_exists().await;

        assert!(matches!(result, Err(IndexClientError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_create_index_sends_strict_mapping() {
        let client = IndexClient::new(Box::new(MockProvider::default()), IndexConfig::default());

        let ack = client.create_index().await.unwrap();

        assert_eq!(ack["body"]["mappings"]["point"]["dynamic"], "strict");
        assert_eq!(
            ack["body"]["mappings"]["point"]["properties"]["location"]["type"],
            "geo_point"
        );
    }

    #[tokio::test]
    async fn test_create_document_generates_id() {
        let provider = MockProvider::default();
        let created = provider.created.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let ack = client.create_document(sample_doc("e23x")).await.unwrap();

        assert_eq!(ack.id.len(), 32);
        let created = created.lock().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, ack.id);
        assert_eq!(created[0].1["path_id"], "e23x");
    }

    #[tokio::test]
    async fn test_create_document_propagates_failure() {
        let provider = MockProvider {
            should_fail: true,
            ..Default::default()
        };
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        assert!(client.create_document(sample_doc("e23x")).await.is_err());
    }

    #[tokio::test]
    async fn test_create_document_multi_empty() {
        let provider = MockProvider::default();
        let bulk_requests = provider.bulk_requests.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let summary = client
            .create_document_multi(Vec::<Document>::new())
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.results.is_empty());
        assert!(bulk_requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_document_multi_unique_ids() {
        let provider = MockProvider::default();
        let bulk_requests = provider.bulk_requests.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let docs = vec![sample_doc("a"), sample_doc("b"), sample_doc("c")];
        let summary = client.create_document_multi(docs).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 3);

        let requests = bulk_requests.lock().await;
        assert_eq!(requests.len(), 1);
        let ids: BTreeSet<&str> = requests[0].iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.len() == 32));
        let paths: Vec<&Value> = requests[0].iter().map(|a| &a.source["path_id"]).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_create_document_multi_id_ordered() {
        let provider = MockProvider::default();
        let bulk_requests = provider.bulk_requests.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let docs: Vec<GeoDocument> = (0..12).map(|i| sample_doc(&format!("p{}", i))).collect();
        let summary = client.create_document_multi_id(docs).await.unwrap();

        assert_eq!(summary.total, 12);

        let requests = bulk_requests.lock().await;
        let actions = &requests[0];
        let prefix = actions[0].id.split('-').next().unwrap().to_string();
        assert_eq!(prefix.len(), 10);
        for (i, action) in actions.iter().enumerate() {
            assert_eq!(action.id, format!("{}-{:06}", prefix, i));
            assert_eq!(action.source["path_id"], format!("p{}", i));
        }
    }

    #[tokio::test]
    async fn test_create_document_multi_id_fresh_prefix_per_call() {
        let provider = MockProvider::default();
        let bulk_requests = provider.bulk_requests.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        client
            .create_document_multi_id(vec![sample_doc("a")])
            .await
            .unwrap();
        client
            .create_document_multi_id(vec![sample_doc("b")])
            .await
            .unwrap();

        let requests = bulk_requests.lock().await;
        assert_ne!(requests[0][0].id, requests[1][0].id);
        assert!(requests[0][0].id.ends_with("-000000"));
        assert!(requests[1][0].id.ends_with("-000000"));
    }

    #[tokio::test]
    async fn test_bulk_chunking() {
        let provider = MockProvider::default();
        let bulk_requests = provider.bulk_requests.clone();
        let config = IndexClientConfig::default().with_bulk_chunk_size(4);
        let client = IndexClient::with_config(Box::new(provider), config);

        let docs: Vec<GeoDocument> = (0..10).map(|i| sample_doc(&format!("p{}", i))).collect();
        let summary = client.create_document_multi_id(docs).await.unwrap();

        assert_eq!(summary.total, 10);
        assert_eq!(summary.succeeded, 10);
        assert_eq!(summary.results.len(), 10);

        let requests = bulk_requests.lock().await;
        let sizes: Vec<usize> = requests.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(summary.results[9].id.ends_with("-000009"));
    }

    #[tokio::test]
    async fn test_bulk_zero_chunk_size() {
        let config = IndexClientConfig::default().with_bulk_chunk_size(0);
        let client = IndexClient::with_config(Box::new(MockProvider::default()), config);

        let result = client.create_document_multi(vec![sample_doc("a")]).await;

        assert!(matches!(result, Err(IndexClientError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_bulk_total_failure_is_error() {
        let provider = MockProvider {
            should_fail: true,
            ..Default::default()
        };
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let result = client.create_document_multi(vec![sample_doc("a")]).await;

        assert!(matches!(result, Err(IndexClientError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_bulk_failed_later_chunk_keeps_written_results() {
        let provider = MockProvider {
            fail_bulk_call: Some(1),
            ..Default::default()
        };
        let bulk_requests = provider.bulk_requests.clone();
        let config = IndexClientConfig::default().with_bulk_chunk_size(2);
        let client = IndexClient::with_config(Box::new(provider), config);

        let docs: Vec<GeoDocument> = (0..5).map(|i| sample_doc(&format!("p{}", i))).collect();
        let summary = client.create_document_multi_id(docs).await.unwrap();

        assert_eq!(bulk_requests.lock().await.len(), 1);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 3);
        assert!(summary.results[0].success);
        assert!(summary.results[1].success);
        for (i, result) in summary.results.iter().enumerate().skip(2) {
            assert!(result.id.ends_with(&format!("-{:06}", i)));
            assert_eq!(result.error.as_deref(), Some("Connection error: reset"));
        }
    }

    #[tokio::test]
    async fn test_bulk_failed_first_chunk_is_error() {
        let provider = MockProvider {
            fail_bulk_call: Some(0),
            ..Default::default()
        };
        let config = IndexClientConfig::default().with_bulk_chunk_size(2);
        let client = IndexClient::with_config(Box::new(provider), config);

        let docs: Vec<GeoDocument> = (0..4).map(|i| sample_doc(&format!("p{}", i))).collect();
        let result = client.create_document_multi_id(docs).await;

        assert!(matches!(result, Err(IndexClientError::ConnectionError(_))));
    }

    struct Scalar(i64);

    impl IntoDocument for Scalar {
        fn into_document(self) -> Result<Document, serde_json::Error> {
            geodata_shared::to_document(&self.0)
        }
    }

    #[tokio::test]
    async fn test_non_object_document_is_serialization_error() {
        let provider = MockProvider::default();
        let created = provider.created.clone();
        let bulk_requests = provider.bulk_requests.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let single = client.create_document(Scalar(42)).await;
        let multi = client.create_document_multi(vec![Scalar(1), Scalar(2)]).await;

        assert!(matches!(single, Err(IndexClientError::SerializationError(_))));
        assert!(matches!(multi, Err(IndexClientError::SerializationError(_))));
        assert!(created.lock().await.is_empty());
        assert!(bulk_requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_query_verbatim() {
        let provider = MockProvider::default();
        let queries = provider.queries.clone();
        let client = IndexClient::new(Box::new(provider), IndexConfig::default());

        let query = json!({
            "query": {
                "filtered": {
                    "filter": {
                        "geo_distance": {
                            "distance": "400",
                            "location": { "lat": 40.715, "lon": -73.988 }
                        }
                    }
                }
            }
        });
        client.search(&query).await.unwrap();
        client.get_all().await.unwrap();

        let queries = queries.lock().await;
        assert_eq!(queries[0], query);
        assert_eq!(queries[1], json!({ "query": { "match_all": {} } }));
    }

    #[test]
    fn test_connect_uses_configured_index() {
        let config = IndexClientConfig::default().with_index("tracks", "sample");
        let client = IndexClient::connect(config).unwrap();

        assert_eq!(client.index_config().index, "tracks");
        assert_eq!(client.index_config().doc_type, "sample");
    }

    #[test]
    fn test_connect_invalid_url() {
        let result = IndexClient::connect(IndexClientConfig::new("::not-a-url"));
        assert!(matches!(result, Err(IndexClientError::ValidationError(_))));
    }
}
