use district_matcher::{
    CascadingMatcher, CollectionCache, ExpansionRule, Feature, FileStore, MatcherConfig,
    MatcherError, MemoryStore, Point,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const CA: &str = "ocd-division/country:us/state:ca";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rect_collection(features: &[(&str, (f64, f64), (f64, f64))]) -> String {
    let features: Vec<String> = features
        .iter()
        .map(|(props, (x0, y0), (x1, y1))| {
            format!(
                r#"{{"type":"Feature","properties":{props},"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

const CONUS: ((f64, f64), (f64, f64)) = ((-125.0, 24.0), (-66.0, 49.0));

fn write_collection(root: &Path, key: &str, document: &str) {
    let path = FileStore::new(root).path_for(key).unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, document).unwrap();
}

fn states_config(dir: &Path) -> MatcherConfig {
    MatcherConfig::default()
        .with_data_dir(dir)
        .with_roots(["states"])
        .with_cache_capacity(16)
}

#[test]
fn test_point_inside_state_and_congress_district() {
    init_logging();
    let dir = tempdir().unwrap();
    write_collection(
        dir.path(),
        "states",
        &rect_collection(&[(
            &format!(r#"{{"STATEFP":"06","OCDID":"{CA}"}}"#),
            CONUS.0,
            CONUS.1,
        )]),
    );
    write_collection(
        dir.path(),
        "congress/06",
        &rect_collection(&[(
            &format!(r#"{{"OCDID":"{CA}/cd:12"}}"#),
            CONUS.0,
            CONUS.1,
        )]),
    );

    let matcher = CascadingMatcher::builder()
        .config(states_config(dir.path()))
        .build()
        .unwrap();

    let matches = matcher.match_lon_lat(-122.4, 37.8).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].tier, matches[0].collection.as_str()), (0, "states"));
    assert_eq!(
        (matches[1].tier, matches[1].collection.as_str()),
        (1, "congress/06")
    );
    assert_eq!(
        matcher
            .match_identifiers(&Point::new(-122.4, 37.8))
            .unwrap(),
        vec![CA.to_string(), format!("{CA}/cd:12")]
    );

    assert!(matcher.match_lon_lat(0.0, 0.0).unwrap().is_empty());
}

#[test]
fn test_missing_sibling_is_skipped() {
    init_logging();
    let dir = tempdir().unwrap();
    write_collection(
        dir.path(),
        "states",
        &rect_collection(&[(r#"{"STATEFP":"99","OCDID":"state"}"#, CONUS.0, CONUS.1)]),
    );
    write_collection(
        dir.path(),
        "sldl/99",
        &rect_collection(&[(r#"{"OCDID":"lower"}"#, CONUS.0, CONUS.1)]),
    );

    let matcher = CascadingMatcher::builder()
        .config(states_config(dir.path()))
        .build()
        .unwrap();

    let ids = matcher.match_identifiers(&Point::new(-100.0, 40.0)).unwrap();
    assert_eq!(ids, vec!["state", "lower"]);

    let stats = matcher.cache().stats();
    assert_eq!(stats.not_found, 2, "congress/99 and sldu/99 are absent");
}

#[test]
fn test_single_root_match_without_children() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    store.insert(
        "states/states",
        rect_collection(&[(r#"{"STATEFP":"02","OCDID":"ak"}"#, (-170.0, 50.0), (-130.0, 72.0))]),
    );

    let matcher = CascadingMatcher::builder().store(store).build().unwrap();
    let matches = matcher.match_lon_lat(-150.0, 61.2).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].tier, 0);
}

#[test]
fn test_all_children_match_in_rule_order() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    store.insert(
        "states/states",
        rect_collection(&[(r#"{"STATEFP":"36","OCDID":"ny"}"#, (-80.0, 40.0), (-71.0, 45.0))]),
    );
    for layer in ["sldu", "congress", "sldl"] {
        store.insert(
            format!("{layer}/36"),
            rect_collection(&[(
                &format!(r#"{{"OCDID":"ny/{layer}"}}"#),
                (-80.0, 40.0),
                (-71.0, 45.0),
            )]),
        );
    }

    let matcher = CascadingMatcher::builder().store(store).build().unwrap();
    let ids = matcher.match_identifiers(&Point::new(-74.0, 42.0)).unwrap();

    assert_eq!(ids, vec!["ny", "ny/congress", "ny/sldl", "ny/sldu"]);
}

#[test]
fn test_no_root_match_never_probes_children() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    store.insert(
        "states/states",
        rect_collection(&[(r#"{"STATEFP":"06"}"#, CONUS.0, CONUS.1)]),
    );
    store.insert(
        "congress/06",
        rect_collection(&[(r#"{}"#, CONUS.0, CONUS.1)]),
    );

    let matcher = CascadingMatcher::builder()
        .store(store.clone())
        .build()
        .unwrap();
    assert!(matcher.match_lon_lat(10.0, 10.0).unwrap().is_empty());

    assert_eq!(store.reads(), 1);
    assert_eq!(matcher.cache().resident_keys(), vec!["states/states"]);
    assert_eq!(matcher.cache().stats().not_found, 0);
}

#[test]
fn test_corrupt_child_fails_the_query() {
    init_logging();
    let dir = tempdir().unwrap();
    write_collection(
        dir.path(),
        "states",
        &rect_collection(&[(r#"{"STATEFP":"06"}"#, CONUS.0, CONUS.1)]),
    );
    write_collection(
        dir.path(),
        "sldl/06",
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":null}]}"#,
    );

    let matcher = CascadingMatcher::builder()
        .config(states_config(dir.path()))
        .build()
        .unwrap();

    let err = matcher.match_lon_lat(-100.0, 40.0).unwrap_err();
    assert!(matches!(err, MatcherError::Parse { ref key, .. } if key == "sldl/06"));
}

#[test]
fn test_repeated_queries_reuse_cached_collections() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    store.insert(
        "states/states",
        rect_collection(&[(r#"{"STATEFP":"06"}"#, CONUS.0, CONUS.1)]),
    );
    store.insert(
        "congress/06",
        rect_collection(&[(r#"{}"#, CONUS.0, CONUS.1)]),
    );

    let cache = Arc::new(CollectionCache::new(store.clone(), 8).unwrap());
    let matcher = CascadingMatcher::builder().cache(cache).build().unwrap();

    for _ in 0..5 {
        assert_eq!(matcher.match_lon_lat(-100.0, 40.0).unwrap().len(), 2);
    }
    assert_eq!(store.reads(), 2);
}

/// Root rule for the two-root tests: every root feature names one child.
fn next_property_rule() -> ExpansionRule {
    Arc::new(|feature: &Feature, tier: u32| {
        if tier > 0 {
            return Vec::new();
        }
        feature
            .property("next")
            .map(|next| vec![next.to_string()])
            .unwrap_or_default()
    })
}

#[test]
fn test_every_root_match_precedes_derived_matches() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let everywhere = ((-10.0, -10.0), (10.0, 10.0));
    for (key, props) in [
        ("ra", r#"{"id":"ra","next":"ca"}"#),
        ("rb", r#"{"id":"rb","next":"cb"}"#),
        ("ca", r#"{"id":"ca"}"#),
        ("cb", r#"{"id":"cb"}"#),
    ] {
        store.insert(key, rect_collection(&[(props, everywhere.0, everywhere.1)]));
    }

    // One slot: every probe evicts the previous collection.
    let cache = Arc::new(CollectionCache::new(store.clone(), 1).unwrap());
    let matcher = CascadingMatcher::new(
        cache,
        vec!["ra".to_string(), "rb".to_string()],
        next_property_rule(),
        "id",
    );

    let point = Point::new(0.0, 0.0);
    assert_eq!(
        matcher.match_identifiers(&point).unwrap(),
        vec!["ra", "rb", "ca", "cb"]
    );
    let tiers: Vec<_> = matcher
        .match_point(&point)
        .unwrap()
        .iter()
        .map(|m| m.tier)
        .collect();
    assert_eq!(tiers, vec![0, 0, 1, 1]);

    assert_eq!(store.reads(), 8);
    let stats = matcher.cache().stats();
    assert_eq!(stats.evictions, 7);
    assert_eq!(stats.resident, 1);
    assert_eq!(matcher.cache().resident_keys(), vec!["cb"]);
}
