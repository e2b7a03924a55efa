//! Point-in-district tests over a loaded collection.

use crate::feature::{Feature, FeatureCollection};
use geo::{Intersects, Point};
use std::sync::Arc;

/// Boundary-inclusive containment: `true` if the point lies inside the
/// feature or on its boundary.
pub fn feature_contains(feature: &Feature, point: &Point<f64>) -> bool {
    match feature.bbox() {
        Some(bbox) if bbox.intersects(&point.0) => feature.boundary().intersects(point),
        _ => false,
    }
}

/// Returns the first feature, in stored order, that contains the point.
///
/// A point exactly on an edge shared by two features matches whichever is
/// stored first.
pub fn find_containing<'a>(
    collection: &'a FeatureCollection,
    point: &Point<f64>,
) -> Option<&'a Arc<Feature>> {
    collection
        .features()
        .iter()
        .find(|feature| feature_contains(feature, point))
}
