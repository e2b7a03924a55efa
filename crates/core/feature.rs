//! District features and the named collections that hold them.

use geo::{BoundingRect, MultiPolygon, Rect};
use geojson::JsonObject;
use std::sync::Arc;

/// One district boundary plus the properties carried through from the source data.
///
/// Areal geometry is normalized to a [`MultiPolygon`]; a plain polygon becomes a
/// multi-polygon of one member.
#[derive(Debug, Clone)]
pub struct Feature {
    boundary: MultiPolygon<f64>,
    bbox: Option<Rect<f64>>,
    properties: JsonObject,
}

impl Feature {
    pub fn new(boundary: impl Into<MultiPolygon<f64>>, properties: JsonObject) -> Self {
        let boundary = boundary.into();
        let bbox = boundary.bounding_rect();
        Self {
            boundary,
            bbox,
            properties,
        }
    }

    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// Bounding rectangle, `None` for an empty boundary.
    pub fn bbox(&self) -> Option<Rect<f64>> {
        self.bbox
    }

    pub fn properties(&self) -> &JsonObject {
        &self.properties
    }

    /// Returns a property value when it is a JSON string.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|v| v.as_str())
    }
}

/// Ordered features loaded from one backing document.
#[derive(Debug)]
pub struct FeatureCollection {
    key: String,
    features: Vec<Arc<Feature>>,
}

impl FeatureCollection {
    pub fn new(key: impl Into<String>, features: Vec<Feature>) -> Self {
        Self {
            key: key.into(),
            features: features.into_iter().map(Arc::new).collect(),
        }
    }

    /// The key this collection was loaded under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
