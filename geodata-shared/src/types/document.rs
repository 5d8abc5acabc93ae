//! Document envelope for the search index.
//!
//! Documents are passed to the search service as-is. The schema is enforced by
//! the index mapping on the service side, so locally a document is nothing more
//! than a JSON object.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

/// A document as submitted to the search index: field name to value.
pub type Document = Map<String, Value>;

/// Conversion into the [`Document`] envelope.
///
/// Implemented for `Document` itself so index operations can accept either raw
/// maps or typed documents.
pub trait IntoDocument {
    /// Consume `self` and produce the JSON object sent to the service.
    fn into_document(self) -> Result<Document, serde_json::Error>;
}

impl IntoDocument for Document {
    fn into_document(self) -> Result<Document, serde_json::Error> {
        Ok(self)
    }
}

/// Serialize `value` into a [`Document`].
///
/// Fails if serialization fails or if `value` does not serialize to a JSON
/// object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde_json::Error::custom(format!(
            "document must be a JSON object, got {}",
            other
        ))),
    }
}
