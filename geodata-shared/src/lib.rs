//! # Geodata Shared
//!
//! This crate defines the document types exchanged with the geodata search
//! index: the untyped [`Document`] envelope that every index operation accepts,
//! and the typed [`GeoDocument`] describing one recorded track point.

pub mod types;

pub use types::document::{to_document, Document, IntoDocument};
pub use types::geo_document::{GeoDocument, GeoPoint};
