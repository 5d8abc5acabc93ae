//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `IndexProvider` using
//! the OpenSearch Rust crate. Typeless requests go through the crate's typed
//! endpoint builders; legacy requests that carry a document type in their path
//! are sent as raw requests on the same transport.

use std::collections::BTreeSet;

use async_trait::async_trait;
use geodata_shared::Document;
use opensearch::{
    http::{
        headers::HeaderMap,
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesGetAliasParts, IndicesGetMappingParts},
    BulkParts, CreateParts, OpenSearch, SearchParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::IndexClientError;
use crate::interfaces::IndexProvider;
use crate::opensearch::index_config::IndexConfig;
use crate::types::{BulkAction, BulkSummary, CreateAck};

/// OpenSearch provider implementation.
///
/// Owns the connection to one search service node.
///
/// # Example
///
/// ```no_run
/// use geodata_repository::opensearch::OpenSearchProvider;
/// use geodata_repository::IndexProvider;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = OpenSearchProvider::new("http://localhost:9200")?;
/// let indices = provider.list_indices().await?;
/// println!("{:?}", indices);
/// # Ok(())
/// # }
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// No request is sent; connection failures surface on the first call.
    ///
    /// # Arguments
    ///
    /// * `url` - The search service URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(IndexClientError)` - If the URL is invalid or the transport cannot be built
    pub fn new(url: &str) -> Result<Self, IndexClientError> {
        let parsed_url = Url::parse(url)
            .map_err(|e| IndexClientError::validation(format!("Invalid URL {}: {}", url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| IndexClientError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Send a raw JSON request on the provider's transport.
    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, IndexClientError> {
        debug!(method = ?method, path = %path, "Sending request");

        let response = self
            .client
            .send(
                method,
                path,
                HeaderMap::new(),
                None::<&()>,
                body.map(JsonBody::new),
                None,
            )
            .await?;

        Ok(response)
    }

    /// Decode a response body, turning non-success statuses into errors.
    async fn read_json(response: Response, operation: &str) -> Result<Value, IndexClientError> {
        let status = response.status_code();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            error!(
                operation = %operation,
                status = %status,
                body = %body,
                "Request failed"
            );
            return Err(IndexClientError::from_service(status.as_u16(), &body));
        }

        Ok(body)
    }

    /// Render bulk actions as the newline-delimited request body.
    ///
    /// Each document becomes an `index` action line followed by its source.
    fn bulk_lines(config: &IndexConfig, actions: &[BulkAction]) -> Vec<Value> {
        let mut lines = Vec::with_capacity(actions.len() * 2);

        for action in actions {
            let meta = if config.is_typed() {
                json!({
                    "index": {
                        "_index": config.index,
                        "_type": config.doc_type,
                        "_id": action.id
                    }
                })
            } else {
                json!({
                    "index": {
                        "_index": config.index,
                        "_id": action.id
                    }
                })
            };
            lines.push(meta);
            lines.push(Value::Object(action.source.clone()));
        }

        lines
    }
}

#[async_trait]
impl IndexProvider for OpenSearchProvider {
    /// List index names by reading the alias table, whose keys are every index.
    async fn list_indices(&self) -> Result<BTreeSet<String>, IndexClientError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::None)
            .send()
            .await?;

        let body = Self::read_json(response, "list_indices").await?;

        let indices = body
            .as_object()
            .ok_or_else(|| IndexClientError::parse("Alias listing is not an object"))?
            .keys()
            .cloned()
            .collect();

        Ok(indices)
    }

    async fn create_index(
        &self,
        config: &IndexConfig,
        body: &Value,
    ) -> Result<Value, IndexClientError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&config.index))
            .body(body.clone())
            .send()
            .await?;

        let ack = Self::read_json(response, "create_index").await?;

        info!(index = %config.index, doc_type = %config.doc_type, "Index created");
        Ok(ack)
    }

    async fn get_mapping(&self, config: &IndexConfig) -> Result<Value, IndexClientError> {
        let response = if config.is_typed() {
            let path = format!("/{}/_mapping/{}", config.index, config.doc_type);
            self.send_raw(Method::Get, &path, None).await?
        } else {
            self.client
                .indices()
                .get_mapping(IndicesGetMappingParts::Index(&[config.index.as_str()]))
                .send()
                .await?
        };

        Self::read_json(response, "get_mapping").await
    }

    async fn delete_index(&self, config: &IndexConfig) -> Result<Value, IndexClientError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[config.index.as_str()]))
            .send()
            .await?;

        let ack = Self::read_json(response, "delete_index").await?;

        info!(index = %config.index, "Index deleted");
        Ok(ack)
    }

    async fn create_document(
        &self,
        config: &IndexConfig,
        id: &str,
        document: &Document,
    ) -> Result<CreateAck, IndexClientError> {
        let source = Value::Object(document.clone());

        let response = if config.is_typed() {
            let path = format!("/{}/{}/{}/_create", config.index, config.doc_type, id);
            self.send_raw(Method::Put, &path, Some(source)).await?
        } else {
            self.client
                .create(CreateParts::IndexId(&config.index, id))
                .body(source)
                .send()
                .await?
        };

        let body = Self::read_json(response, "create_document").await?;
        let ack: CreateAck = serde_json::from_value(body)
            .map_err(|e| IndexClientError::parse(format!("Invalid create response: {}", e)))?;

        debug!(doc_id = %ack.id, version = ?ack.version, "Document created");
        Ok(ack)
    }

    async fn bulk_index(
        &self,
        config: &IndexConfig,
        actions: &[BulkAction],
    ) -> Result<BulkSummary, IndexClientError> {
        let body: Vec<JsonBody<Value>> = Self::bulk_lines(config, actions)
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await?;

        let body = Self::read_json(response, "bulk_index").await?;
        let summary = BulkSummary::from_response(actions, &body)?;

        if summary.has_failures() {
            error!(
                index = %config.index,
                total = summary.total,
                failed = summary.failed,
                "Bulk request had failures"
            );
        } else {
            debug!(index = %config.index, total = summary.total, "Bulk request completed");
        }

        Ok(summary)
    }

    async fn search(&self, config: &IndexConfig, query: &Value) -> Result<Value, IndexClientError> {
        let response = if config.is_typed() {
            let path = format!("/{}/{}/_search", config.index, config.doc_type);
            self.send_raw(Method::Post, &path, Some(query.clone())).await?
        } else {
            self.client
                .search(SearchParts::Index(&[config.index.as_str()]))
                .body(query.clone())
                .send()
                .await?
        };

        Self::read_json(response, "search").await
    }
}
