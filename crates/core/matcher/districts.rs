//! US legislative district cascade.
//!
//! The root collection holds state boundaries. A matched state's FIPS code
//! names its congressional, lower-chamber and upper-chamber collections,
//! e.g. `congress/06`, `sldl/06`, `sldu/06`. Nothing is derived past tier 1.

use super::ExpansionRule;
use crate::feature::Feature;
use std::sync::Arc;

/// Build the expansion rule probing `layer/<region>` for each layer, where
/// `<region>` is read from `region_property` of a root match.
///
/// Region codes that are not plain ASCII alphanumerics yield no candidates.
pub fn district_expansion(layers: Vec<String>, region_property: String) -> ExpansionRule {
    Arc::new(move |feature: &Feature, tier: u32| {
        if tier > 0 {
            return Vec::new();
        }

        match feature.property(&region_property) {
            Some(region) if is_region_code(region) => layer_keys(&layers, region).collect(),
            _ => Vec::new(),
        }
    })
}

/// Every `layer/region` key, for warming the cache ahead of queries.
pub fn preload_keys(layers: &[String], regions: &[String]) -> Vec<String> {
    regions
        .iter()
        .filter(|region| is_region_code(region))
        .flat_map(|region| layer_keys(layers, region))
        .collect()
}

fn layer_keys<'a>(layers: &'a [String], region: &'a str) -> impl Iterator<Item = String> + 'a {
    layers.iter().map(move |layer| format!("{}/{}", layer, region))
}

fn is_region_code(region: &str) -> bool {
    !region.is_empty() && region.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, Rect, coord};
    use geojson::JsonObject;

    fn state(fips: Option<&str>) -> Feature {
        let mut props = JsonObject::new();
        if let Some(fips) = fips {
            props.insert("STATEFP".into(), fips.into());
        }
        let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 });
        Feature::new(MultiPolygon::new(vec![rect.to_polygon()]), props)
    }

    fn rule() -> ExpansionRule {
        district_expansion(
            vec!["congress".into(), "sldl".into(), "sldu".into()],
            "STATEFP".into(),
        )
    }

    #[test]
    fn test_root_match_expands_to_all_layers() {
        assert_eq!(
            rule()(&state(Some("06")), 0),
            vec!["congress/06", "sldl/06", "sldu/06"]
        );
    }

    #[test]
    fn test_no_expansion_past_first_tier() {
        assert!(rule()(&state(Some("06")), 1).is_empty());
        assert!(rule()(&state(Some("06")), 7).is_empty());
    }

    #[test]
    fn test_missing_or_unsafe_region_yields_nothing() {
        assert!(rule()(&state(None), 0).is_empty());
        assert!(rule()(&state(Some("")), 0).is_empty());
        assert!(rule()(&state(Some("../06")), 0).is_empty());
    }

    #[test]
    fn test_preload_keys() {
        let layers = vec!["congress".to_string(), "sldu".to_string()];
        let regions = vec!["06".to_string(), "a/b".to_string(), "31".to_string()];

        assert_eq!(
            preload_keys(&layers, &regions),
            vec!["congress/06", "sldu/06", "congress/31", "sldu/31"]
        );
    }
}
