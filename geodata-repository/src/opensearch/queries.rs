//! Query bodies for the geodata index.
//!
//! The index client passes query bodies through verbatim; these helpers only
//! build the bodies used most often against the geodata index.

use geodata_shared::GeoPoint;
use serde_json::{json, Value};

use crate::opensearch::index_config::MappingDialect;

/// Query matching every document.
pub fn match_all() -> Value {
    json!({
        "query": {
            "match_all": {}
        }
    })
}

/// Query matching documents whose `location` lies within `distance_m` meters
/// of `center`.
///
/// Legacy services use a `filtered` query; typeless ones dropped it in favour
/// of a `bool` query with a `filter` clause.
pub fn geo_distance(distance_m: u32, center: GeoPoint, dialect: MappingDialect) -> Value {
    let filter = json!({
        "geo_distance": {
            "distance": format!("{}m", distance_m),
            "location": {
                "lat": center.lat,
                "lon": center.lon
            }
        }
    });

    match dialect {
        MappingDialect::Legacy => json!({
            "query": {
                "filtered": {
                    "filter": filter
                }
            }
        }),
        MappingDialect::Typeless => json!({
            "query": {
                "bool": {
                    "filter": filter
                }
            }
        }),
    }
}
