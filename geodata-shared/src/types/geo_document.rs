//! Geodata document types for the search index.
//!
//! This module defines the track-point document stored in the geodata index.

use serde::{Deserialize, Serialize};

use crate::types::document::{to_document, Document, IntoDocument};

/// A latitude/longitude pair, serialized as `{"lat": .., "lon": ..}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One recorded point of a user's path.
///
/// All fields except `location` are indexed as strings, matching the index
/// mapping; `speed` and `gradient` are kept as the textual values reported by
/// the upstream pipeline.
///
/// # Fields
///
/// - `path_id`: Identifier of the path this point was stitched into
/// - `user_id`: The user who recorded the point
/// - `location`: Where the point was recorded
/// - `speed`: Speed at this point
/// - `gradient`: Gradient at this point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoDocument {
    pub path_id: String,
    pub user_id: String,
    pub location: GeoPoint,
    pub speed: String,
    pub gradient: String,
}

impl GeoDocument {
    /// Create a new geodata document.
    ///
    /// # Example
    ///
    /// ```
    /// use geodata_shared::{GeoDocument, GeoPoint};
    ///
    /// let doc = GeoDocument::new("e23x", "1233", GeoPoint::new(40.713, -73.986), "32.4", "42");
    /// assert_eq!(doc.path_id, "e23x");
    /// ```
    pub fn new(
        path_id: impl Into<String>,
        user_id: impl Into<String>,
        location: GeoPoint,
        speed: impl Into<String>,
        gradient: impl Into<String>,
    ) -> Self {
        Self {
            path_id: path_id.into(),
            user_id: user_id.into(),
            location,
            speed: speed.into(),
            gradient: gradient.into(),
        }
    }
}

impl IntoDocument for GeoDocument {
    fn into_document(self) -> Result<Document, serde_json::Error> {
        to_document(&self)
    }
}
