//! # Geodata Inspect
//!
//! Connects to the search service, creates the geodata index when it is
//! missing and prints the index mapping.
//!
//! ## Modules
//!
//! - [`config`]: Settings read from the environment

pub mod config;

pub use config::Settings;

use geodata_repository::{IndexClient, IndexClientError};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while inspecting the index.
#[derive(Error, Debug)]
pub enum InspectError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the index client.
    #[error("Index error: {0}")]
    IndexError(#[from] IndexClientError),

    /// Failed to render the mapping.
    #[error("Render error: {0}")]
    RenderError(#[from] serde_json::Error),
}

impl InspectError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Ensure the configured index exists and return its mapping.
///
/// The index is created with the strict geodata mapping when the service
/// does not list it yet.
pub async fn ensure_index(client: &IndexClient) -> Result<Value, InspectError> {
    let index = &client.index_config().index;

    if client.index_exists().await? {
        info!(index = %index, "Index already exists");
    } else {
        client.create_index().await?;
        info!(index = %index, "Index created");
    }

    Ok(client.get_mapping().await?)
}

/// Pretty-print a mapping response.
pub fn render_mapping(mapping: &Value) -> Result<String, InspectError> {
    Ok(serde_json::to_string_pretty(mapping)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_mapping_is_indented() {
        let mapping = json!({ "geodata": { "mappings": { "point": { "dynamic": "strict" } } } });

        let rendered = render_mapping(&mapping).unwrap();

        assert!(rendered.contains("\n  \"geodata\": {"));
        assert!(rendered.contains("\"dynamic\": \"strict\""));
    }

    #[test]
    fn test_index_error_wraps_client_error() {
        let err: InspectError = IndexClientError::connection("refused").into();

        assert_eq!(err.to_string(), "Index error: Connection error: refused");
    }
}
