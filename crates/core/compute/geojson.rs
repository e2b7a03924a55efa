//! GeoJSON parsing for district collections.
//!
//! A collection document must be a `FeatureCollection` whose features all carry
//! `Polygon` or `MultiPolygon` geometry. Anything else is a parse error for the
//! whole document; collections are never partially loaded.

use crate::error::{MatcherError, Result};
use crate::feature::{Feature, FeatureCollection};
use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;

/// Parses a GeoJSON document into the collection stored under `key`.
pub fn parse_collection(key: &str, bytes: &[u8]) -> Result<FeatureCollection> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| MatcherError::parse(key, format!("document is not UTF-8: {}", e)))?;

    let geojson: GeoJson = text
        .parse()
        .map_err(|e| MatcherError::parse(key, format!("invalid GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => {
            return Err(MatcherError::parse(
                key,
                "expected a FeatureCollection, found a Feature",
            ));
        }
        GeoJson::Geometry(_) => {
            return Err(MatcherError::parse(
                key,
                "expected a FeatureCollection, found a Geometry",
            ));
        }
    };

    let features = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let geometry = feature.geometry.ok_or_else(|| {
                MatcherError::parse(key, format!("feature {} has no geometry", index))
            })?;
            let boundary = boundary_from_geojson(geometry).map_err(|message| {
                MatcherError::parse(key, format!("feature {}: {}", index, message))
            })?;
            Ok(Feature::new(boundary, feature.properties.unwrap_or_default()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection::new(key, features))
}

fn boundary_from_geojson(
    geometry: geojson::Geometry,
) -> std::result::Result<MultiPolygon<f64>, String> {
    let geometry: Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| format!("malformed geometry: {}", e))?;

    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon])),
        Geometry::MultiPolygon(multi) => Ok(multi),
        other => Err(format!(
            "unsupported geometry type {}, expected Polygon or MultiPolygon",
            geometry_name(&other)
        )),
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::LineString(_) | Geometry::Line(_) => "LineString",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "Unknown",
    }
}
