//! Index client error types.
//!
//! This module defines the unified error type for all geodata index operations.
//! Errors reported by the search service keep the service's own error type and
//! reason; they are only sorted into variants so callers can match on the
//! common cases.

use serde_json::Value;
use thiserror::Error;

/// Unified errors from geodata index operations.
///
/// Used by the `IndexProvider` trait and `IndexClient` for all operations.
/// Partial failures inside a bulk request are not errors; they are reported in
/// the `BulkSummary` returned by the bulk calls.
#[derive(Debug, Clone, Error)]
pub enum IndexClientError {
    /// Invalid client-side input (e.g., malformed URL, zero chunk size).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the search service.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The configured index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The index already exists.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// The service rejected a mapping or a document that violates it.
    #[error("Mapping rejected: {0}")]
    MappingRejected(String),

    /// A document with the same identifier already exists.
    #[error("Document already exists: {0}")]
    DocumentAlreadyExists(String),

    /// The service could not parse or execute a query.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Any other error response from the service.
    #[error("Service error ({status}) {error_type}: {reason}")]
    ServiceError {
        status: u16,
        error_type: String,
        reason: String,
    },

    /// Failed to parse a response from the service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a document into a JSON object.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IndexClientError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Build an error from a non-success service response.
    ///
    /// The service reports errors as `{"error": {"type": .., "reason": ..}}`;
    /// very old versions report a bare string such as
    /// `IndexMissingException[[geodata] missing]` instead. The exception name
    /// at the start of such a string is classified like the `type` field. An
    /// unparseable body falls back to its raw text.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code of the response
    /// * `body` - Response body, already decoded as JSON
    pub fn from_service(status: u16, body: &Value) -> Self {
        match body.get("error") {
            Some(Value::Object(error)) => {
                let error_type = error
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let reason = error
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let message = if error_type.is_empty() {
                    reason.clone()
                } else {
                    format!("{}: {}", error_type, reason)
                };
                Self::classify(status, error_type, reason, message)
            }
            Some(Value::String(reason)) => Self::classify(
                status,
                legacy_error_type(reason),
                reason.clone(),
                reason.clone(),
            ),
            _ => Self::classify(status, String::new(), body.to_string(), body.to_string()),
        }
    }

    /// Describe the error attached to a single bulk response item.
    pub fn describe_item_error(error: &Value) -> String {
        match error {
            Value::Object(obj) => {
                let error_type = obj.get("type").and_then(Value::as_str).unwrap_or("error");
                let reason = obj.get("reason").and_then(Value::as_str).unwrap_or_default();
                format!("{}: {}", error_type, reason)
            }
            Value::String(reason) => reason.clone(),
            other => other.to_string(),
        }
    }

    fn classify(status: u16, error_type: String, reason: String, message: String) -> Self {
        match error_type.as_str() {
            "index_not_found_exception" | "index_missing_exception" => {
                Self::IndexNotFound(message)
            }
            "resource_already_exists_exception" | "index_already_exists_exception" => {
                Self::IndexAlreadyExists(message)
            }
            "strict_dynamic_mapping_exception" | "mapper_parsing_exception" => {
                Self::MappingRejected(message)
            }
            "version_conflict_engine_exception" | "document_already_exists_exception" => {
                Self::DocumentAlreadyExists(message)
            }
            "parsing_exception"
            | "query_parsing_exception"
            | "query_shard_exception"
            | "search_phase_execution_exception" => Self::QueryError(message),
            _ if error_type.is_empty() && status == 404 => Self::IndexNotFound(message),
            _ if error_type.is_empty() && status == 409 => Self::DocumentAlreadyExists(message),
            _ => Self::ServiceError {
                status,
                error_type,
                reason,
            },
        }
    }
}

/// Snake-case type of a legacy `SomeException[...]` error string, or an empty
/// string when the text does not start with an exception name.
fn legacy_error_type(reason: &str) -> String {
    let name = reason.split('[').next().unwrap_or_default().trim();
    if !name.ends_with("Exception") || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return String::new();
    }

    let mut error_type = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                error_type.push('_');
            }
            error_type.push(c.to_ascii_lowercase());
        } else {
            error_type.push(c);
        }
    }
    error_type
}

impl From<opensearch::Error> for IndexClientError {
    fn from(err: opensearch::Error) -> Self {
        if err.is_json() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IndexClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
