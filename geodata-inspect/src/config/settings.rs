//! Environment-driven settings for the inspect binary.

use std::env;

use geodata_repository::config::DEFAULT_URL;
use geodata_repository::{IndexClientConfig, MappingDialect};
use tracing::warn;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Search service URL.
    pub url: String,
    /// API generation the service speaks.
    pub dialect: MappingDialect,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: Search service URL (default: http://localhost:9200)
    /// - `INDEX_DIALECT`: "legacy" or "typeless" (default: legacy)
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("OPENSEARCH_URL").ok(),
            env::var("INDEX_DIALECT").ok(),
        )
    }

    fn from_values(url: Option<String>, dialect: Option<String>) -> Self {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let dialect = match dialect.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("legacy") => MappingDialect::Legacy,
            Some("typeless") => MappingDialect::Typeless,
            Some(other) => {
                warn!(dialect = %other, "Invalid INDEX_DIALECT, defaulting to 'legacy'");
                MappingDialect::Legacy
            }
        };

        Self { url, dialect }
    }

    /// Client configuration for the default geodata index.
    pub fn client_config(&self) -> IndexClientConfig {
        IndexClientConfig::new(self.url.clone()).with_dialect(self.dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_values(None, None);

        assert_eq!(settings.url, "http://localhost:9200");
        assert_eq!(settings.dialect, MappingDialect::Legacy);
    }

    #[test]
    fn test_values_from_env() {
        let settings = Settings::from_values(
            Some("http://search:9200".to_string()),
            Some("Typeless".to_string()),
        );

        assert_eq!(settings.url, "http://search:9200");
        assert_eq!(settings.dialect, MappingDialect::Typeless);

        let config = settings.client_config();
        assert_eq!(config.url, "http://search:9200");
        assert_eq!(config.index.index, "geodata");
        assert_eq!(config.index.dialect, MappingDialect::Typeless);
    }

    #[test]
    fn test_blank_url_and_unknown_dialect() {
        let settings = Settings::from_values(Some("  ".to_string()), Some("v2".to_string()));

        assert_eq!(settings.url, "http://localhost:9200");
        assert_eq!(settings.dialect, MappingDialect::Legacy);
    }
}
