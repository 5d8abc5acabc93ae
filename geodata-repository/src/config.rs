//! Configuration types for the IndexClient.

use crate::opensearch::{IndexConfig, MappingDialect};

/// Default search service URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Default number of documents sent per bulk request.
pub const DEFAULT_BULK_CHUNK_SIZE: usize = 500;

/// Configuration for the IndexClient.
///
/// Bundles where the search service lives, which index and document type the
/// client is scoped to, and how bulk loads are split into requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexClientConfig {
    /// Search service URL.
    pub url: String,
    /// Index name, document type and dialect.
    pub index: IndexConfig,
    /// Maximum number of documents sent in a single bulk request. Larger
    /// batches are split into consecutive requests.
    pub bulk_chunk_size: usize,
}

impl Default for IndexClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            index: IndexConfig::default(),
            bulk_chunk_size: DEFAULT_BULK_CHUNK_SIZE,
        }
    }
}

impl IndexClientConfig {
    /// Create a config for the default index at the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Scope the client to another index and document type.
    pub fn with_index(mut self, index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        self.index = IndexConfig::new(index, doc_type).with_dialect(self.index.dialect);
        self
    }

    /// Use the given mapping dialect.
    pub fn with_dialect(mut self, dialect: MappingDialect) -> Self {
        self.index.dialect = dialect;
        self
    }

    /// Set the bulk chunk size.
    pub fn with_bulk_chunk_size(mut self, bulk_chunk_size: usize) -> Self {
        self.bulk_chunk_size = bulk_chunk_size;
        self
    }
}
