//! Request and response types for geodata index operations.

use geodata_shared::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::IndexClientError;

/// Acknowledgment returned by the service when a single document is created.
///
/// Fields that only some service versions report are optional: typeless
/// services return `result: "created"`, legacy ones return `created: true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateAck {
    /// Index the document was written to.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document type, reported by legacy services only.
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Identifier the document was stored under.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version after the write.
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Operation result (e.g. "created").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Legacy creation flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    /// Shard routing information as reported by the service.
    #[serde(rename = "_shards", default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<Value>,
}

/// One document to be submitted in a bulk request, with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAction {
    /// Identifier the document will be stored under.
    pub id: String,
    /// The document itself.
    pub source: Document,
}

impl BulkAction {
    /// Create a new bulk action.
    pub fn new(id: impl Into<String>, source: Document) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

/// Result of a bulk operation for a single document.
///
/// This struct represents the outcome of one action within a bulk request. It
/// indicates whether the service accepted the document and includes the
/// service's error description if it did not.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResult {
    /// The document identifier.
    pub id: String,
    /// HTTP status the service reported for this item.
    pub status: u16,
    /// Whether the document was written.
    pub success: bool,
    /// Error reported by the service if the item failed.
    pub error: Option<String>,
}

/// Summary of a bulk operation containing aggregate statistics and per-item results.
///
/// Bulk requests can partially succeed. The summary is returned even when some
/// items failed, so callers must check `failed` (or `has_failures`) to detect
/// rejected documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSummary {
    /// Total number of documents submitted.
    pub total: usize,
    /// Number of documents written.
    pub succeeded: usize,
    /// Number of documents rejected.
    pub failed: usize,
    /// Individual results, in submission order.
    pub results: Vec<BulkItemResult>,
}

impl BulkSummary {
    /// An empty summary, for batches with no documents.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if any item in the batch failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Identifiers of the items that failed, in submission order.
    pub fn failed_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.id.as_str())
            .collect()
    }

    /// Append the results of another chunk of the same batch.
    pub fn merge(&mut self, other: BulkSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.results.extend(other.results);
    }

    /// A summary marking every action as failed with `error`, for actions whose
    /// request did not go through.
    pub fn not_sent(actions: &[BulkAction], error: &IndexClientError) -> Self {
        let reason = error.to_string();
        BulkSummary {
            total: actions.len(),
            succeeded: 0,
            failed: actions.len(),
            results: actions
                .iter()
                .map(|action| BulkItemResult {
                    id: action.id.clone(),
                    status: 0,
                    success: false,
                    error: Some(reason.clone()),
                })
                .collect(),
        }
    }

    /// Build a summary from a bulk response body.
    ///
    /// Each entry of `items` is an object keyed by the action name
    /// (`{"index": {"_id": .., "status": .., "error": ..}}`). Items are matched
    /// to `actions` by position, which is the order the service reports them in.
    ///
    /// # Arguments
    ///
    /// * `actions` - The actions that were submitted, in request order
    /// * `body` - The decoded bulk response
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-item outcomes
    /// * `Err(IndexClientError::ParseError)` - If the response does not list one item per action
    pub fn from_response(actions: &[BulkAction], body: &Value) -> Result<Self, IndexClientError> {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| IndexClientError::parse("Bulk response has no items array"))?;

        if items.len() != actions.len() {
            return Err(IndexClientError::parse(format!(
                "Bulk response has {} items for {} actions",
                items.len(),
                actions.len()
            )));
        }

        let mut summary = BulkSummary {
            total: actions.len(),
            ..Default::default()
        };

        for (action, item) in actions.iter().zip(items) {
            let outcome = item
                .as_object()
                .and_then(|obj| obj.values().next())
                .ok_or_else(|| IndexClientError::parse("Bulk response item is not an object"))?;

            let id = outcome
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or(action.id.as_str())
                .to_string();
            let status = outcome
                .get("status")
                .and_then(Value::as_u64)
                .and_then(|s| u16::try_from(s).ok())
                .unwrap_or(0);
            let error = outcome
                .get("error")
                .map(IndexClientError::describe_item_error);
            let success = error.is_none() && (200..300).contains(&status);

            if success {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }

            summary.results.push(BulkItemResult {
                id,
                status,
                success,
                error,
            });
        }

        Ok(summary)
    }
}
