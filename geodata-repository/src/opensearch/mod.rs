//! OpenSearch implementation of the index provider.
//!
//! This module provides a concrete implementation of `IndexProvider` using
//! OpenSearch as the backend, plus the index mapping and query bodies.

mod index_config;
mod provider;
pub mod queries;

pub use index_config::{
    get_index_settings, mapped_field_types, FieldType, IndexConfig, MappingDialect,
    DEFAULT_DOC_TYPE, DEFAULT_INDEX_NAME, GEO_FIELDS,
};
pub use provider::OpenSearchProvider;
