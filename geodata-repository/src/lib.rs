//! # Geodata Repository
//!
//! This crate provides the client for the geodata search index. It includes
//! definitions for errors, the provider interface, and a concrete
//! implementation for OpenSearch.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;
pub mod utils;

pub use client::IndexClient;
pub use config::IndexClientConfig;
pub use errors::IndexClientError;
pub use interfaces::IndexProvider;
pub use opensearch::{IndexConfig, MappingDialect, OpenSearchProvider};
pub use types::{BulkAction, BulkItemResult, BulkSummary, CreateAck};
pub use utils::{generate_id, generate_prefix, sequential_id};
