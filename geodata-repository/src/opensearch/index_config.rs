//! Index configuration and mappings for the geodata index.
//!
//! This module defines which index and document type a client is scoped to, and
//! the fixed strict mapping the index is created with.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// Default index name.
pub const DEFAULT_INDEX_NAME: &str = "geodata";

/// Default document type name.
pub const DEFAULT_DOC_TYPE: &str = "point";

/// Which generation of the search API the service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingDialect {
    /// Services with mapping types: mappings are nested under the document
    /// type, text fields use the `string` type, and document endpoints carry
    /// the type in their path.
    #[default]
    Legacy,
    /// Typeless services (OpenSearch, recent Elasticsearch): no type level in
    /// mappings or paths, text fields use `keyword`. The document type name is
    /// kept in the mapping's `_meta`.
    Typeless,
}

/// Field types used by the geodata mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Unanalyzed text value.
    Text,
    /// Latitude/longitude point.
    GeoPoint,
}

impl FieldType {
    /// Name of the field type in the given dialect.
    pub fn as_str(&self, dialect: MappingDialect) -> &'static str {
        match (self, dialect) {
            (FieldType::Text, MappingDialect::Legacy) => "string",
            (FieldType::Text, MappingDialect::Typeless) => "keyword",
            (FieldType::GeoPoint, _) => "geo_point",
        }
    }
}

/// The fields of the geodata mapping, in declaration order.
pub const GEO_FIELDS: [(&str, FieldType); 5] = [
    // Computed upstream by stitching points together.
    ("path_id", FieldType::Text),
    ("user_id", FieldType::Text),
    ("location", FieldType::GeoPoint),
    ("speed", FieldType::Text),
    ("gradient", FieldType::Text),
];

/// Configuration for the geodata index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The index name (used for all operations).
    pub index: String,
    /// The document type name.
    pub doc_type: String,
    /// The API generation used to talk to the service.
    pub dialect: MappingDialect,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME, DEFAULT_DOC_TYPE)
    }
}

impl IndexConfig {
    /// Create a new index configuration with the legacy dialect.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `doc_type` - The document type name
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            dialect: MappingDialect::default(),
        }
    }

    /// Use the given dialect.
    pub fn with_dialect(mut self, dialect: MappingDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Whether requests carry the document type.
    pub fn is_typed(&self) -> bool {
        self.dialect == MappingDialect::Legacy
    }
}

/// Get the `properties` section of the geodata mapping.
fn geo_properties(dialect: MappingDialect) -> Value {
    let properties: Map<String, Value> = GEO_FIELDS
        .iter()
        .map(|(name, field_type)| {
            (
                name.to_string(),
                json!({ "type": field_type.as_str(dialect) }),
            )
        })
        .collect();
    Value::Object(properties)
}

/// Get the index creation body for the geodata index.
///
/// The mapping is strict: documents carrying fields other than the declared
/// ones are rejected by the service.
///
/// # Arguments
///
/// * `config` - The index configuration (document type and dialect)
pub fn get_index_settings(config: &IndexConfig) -> Value {
    let properties = geo_properties(config.dialect);

    match config.dialect {
        MappingDialect::Legacy => json!({
            "mappings": {
                config.doc_type.as_str(): {
                    "dynamic": "strict",
                    "properties": properties
                }
            }
        }),
        MappingDialect::Typeless => json!({
            "mappings": {
                "dynamic": "strict",
                "_meta": { "doc_type": config.doc_type },
                "properties": properties
            }
        }),
    }
}

/// Extract the `field -> type` pairs from a get-mapping response.
///
/// Accepts both response layouts: `{index: {mappings: {type: {properties}}}}`
/// and `{index: {mappings: {properties}}}`. Returns an empty map when the
/// response does not describe the configured index.
pub fn mapped_field_types(config: &IndexConfig, response: &Value) -> BTreeMap<String, String> {
    let mappings = &response[config.index.as_str()]["mappings"];
    let properties = if mappings.get("properties").is_some() {
        &mappings["properties"]
    } else {
        &mappings[config.doc_type.as_str()]["properties"]
    };

    properties
        .as_object()
        .map(|props| {
            props
                .iter()
                .filter_map(|(name, field)| {
                    field
                        .get("type")
                        .and_then(Value::as_str)
                        .map(|t| (name.clone(), t.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}
