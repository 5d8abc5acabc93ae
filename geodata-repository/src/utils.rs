//! Identifier generation for geodata documents.
//!
//! Random identifiers are UUID v4 values rendered as 32 lowercase hex digits
//! without hyphens. Ordered identifiers share a prefix taken from one random
//! identifier and append a zero-padded sequence number.

use uuid::Uuid;

/// Number of characters of a random identifier used as a batch prefix.
pub const PREFIX_LEN: usize = 10;

/// Minimum number of digits of the sequence number in an ordered identifier.
pub const SEQUENCE_WIDTH: usize = 6;

/// Generate a random document identifier.
///
/// # Example
///
/// ```
/// use geodata_repository::generate_id;
///
/// let id = generate_id();
/// assert_eq!(id.len(), 32);
/// ```
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Generate a fresh prefix for a batch of ordered identifiers.
pub fn generate_prefix() -> String {
    let mut id = generate_id();
    id.truncate(PREFIX_LEN);
    id
}

/// Build the ordered identifier of the `sequence`-th document of a batch.
///
/// The sequence number is zero-padded to [`SEQUENCE_WIDTH`] digits, so for
/// batches under a million documents the identifiers also sort in batch order.
pub fn sequential_id(prefix: &str, sequence: usize) -> String {
    format!("{}-{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
}
