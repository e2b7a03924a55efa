//! GeoJSON parsing and point containment.

pub mod containment;
pub mod geojson;

pub use self::containment::{feature_contains, find_containing};
pub use self::geojson::parse_collection;
