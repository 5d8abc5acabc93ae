//! Index provider trait definition.
//!
//! This module defines the abstract interface for the requests the index
//! client sends, allowing for different backend implementations.

use std::collections::BTreeSet;

use async_trait::async_trait;
use geodata_shared::Document;
use serde_json::Value;

use crate::errors::IndexClientError;
use crate::opensearch::IndexConfig;
use crate::types::{BulkAction, BulkSummary, CreateAck};

/// Abstracts the search service the index client talks to.
///
/// Each method is a single request against the service. Implementations are
/// injected into `IndexClient`, which keeps the client testable with in-memory
/// or mock providers.
///
/// All methods return `Result<T, IndexClientError>`. Errors reported by the
/// service should be built with `IndexClientError::from_service` so they keep
/// the service's error type and reason.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// List the names of all indices known to the service.
    async fn list_indices(&self) -> Result<BTreeSet<String>, IndexClientError>;

    /// Create the configured index with the given creation body.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The service's acknowledgment
    /// * `Err(IndexClientError::IndexAlreadyExists)` - If the index exists
    /// * `Err(IndexClientError)` - If the mapping is rejected or the request fails
    async fn create_index(
        &self,
        config: &IndexConfig,
        body: &Value,
    ) -> Result<Value, IndexClientError>;

    /// Get the mapping of the configured index and document type.
    async fn get_mapping(&self, config: &IndexConfig) -> Result<Value, IndexClientError>;

    /// Delete the configured index.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The service's acknowledgment
    /// * `Err(IndexClientError::IndexNotFound)` - If the index does not exist
    async fn delete_index(&self, config: &IndexConfig) -> Result<Value, IndexClientError>;

    /// Create a single document under `id`. Fails if the identifier is taken.
    async fn create_document(
        &self,
        config: &IndexConfig,
        id: &str,
        document: &Document,
    ) -> Result<CreateAck, IndexClientError>;

    /// Submit `actions` as one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-item outcomes, including rejected documents
    /// * `Err(IndexClientError)` - If the request as a whole fails
    async fn bulk_index(
        &self,
        config: &IndexConfig,
        actions: &[BulkAction],
    ) -> Result<BulkSummary, IndexClientError>;

    /// Run `query` against the configured index and document type.
    async fn search(&self, config: &IndexConfig, query: &Value) -> Result<Value, IndexClientError>;
}
