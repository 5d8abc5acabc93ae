//! This module defines the document types used across the geodata crates.
//! It re-exports the `Document` envelope and the `GeoDocument` shape.

pub mod document;
pub mod geo_document;

pub use document::{to_document, Document, IntoDocument};
pub use geo_document::{GeoDocument, GeoPoint};
