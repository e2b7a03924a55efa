//! Cascading point lookup over tiers of collections.
//!
//! A query first probes every root collection. Each match is handed to the
//! expansion rule, which names the collections to probe next; their matches
//! are expanded in turn, breadth first, until the rule yields nothing.

use crate::cache::CollectionCache;
use crate::compute::containment::find_containing;
use crate::error::{MatcherError, Result};
use crate::feature::Feature;
use geo::Point;
use std::collections::VecDeque;
use std::sync::Arc;

pub mod districts;

pub use districts::{district_expansion, preload_keys};

/// Maps a matched feature and its tier to the collection keys to probe next.
///
/// Rules must be pure and total: absent collections are handled by the
/// loader, never by the rule.
pub type ExpansionRule = Arc<dyn Fn(&Feature, u32) -> Vec<String> + Send + Sync>;

/// A feature containing the query point, with the cascade depth it was found at.
#[derive(Debug, Clone)]
pub struct Match {
    /// 0 for root collections, `k + 1` for collections derived from a tier-`k` match
    pub tier: u32,
    /// Key of the collection the feature was found in
    pub collection: String,
    pub feature: Arc<Feature>,
}

impl Match {
    pub fn identifier(&self, property: &str) -> Option<&str> {
        self.feature.property(property)
    }
}

/// Point-in-district engine parameterized by root collections and an
/// expansion rule.
///
/// Holds no geometry itself; every collection comes from the shared cache.
#[derive(Clone)]
pub struct CascadingMatcher {
    cache: Arc<CollectionCache>,
    roots: Vec<String>,
    expand: ExpansionRule,
    identifier_property: String,
    preload: Vec<String>,
}

impl CascadingMatcher {
    pub fn new(
        cache: Arc<CollectionCache>,
        roots: Vec<String>,
        expand: ExpansionRule,
        identifier_property: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            roots,
            expand,
            identifier_property: identifier_property.into(),
            preload: Vec::new(),
        }
    }

    pub fn builder() -> crate::builder::MatcherBuilder {
        crate::builder::MatcherBuilder::new()
    }

    /// Collections loaded by [`warm_up`](Self::warm_up) in addition to the roots.
    pub fn with_preload(mut self, keys: Vec<String>) -> Self {
        self.preload = keys;
        self
    }

    pub fn cache(&self) -> &Arc<CollectionCache> {
        &self.cache
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn identifier_property(&self) -> &str {
        &self.identifier_property
    }

    /// Load the roots and any preload collections into the cache.
    ///
    /// A missing root is a configuration error; missing preload collections
    /// are skipped. Returns the number of collections now loaded.
    pub fn warm_up(&self) -> Result<usize> {
        let mut loaded = 0;
        for root in &self.roots {
            self.load_root(root)?;
            loaded += 1;
        }

        for key in &self.preload {
            match self.cache.load(key) {
                Ok(_) => loaded += 1,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Warmed up {} collections ({} resident, capacity {})",
            loaded,
            self.cache.len(),
            self.cache.capacity()
        );
        Ok(loaded)
    }

    fn load_root(&self, root: &str) -> Result<Arc<crate::feature::FeatureCollection>> {
        self.cache.load(root).map_err(|e| match e {
            MatcherError::NotFound(key) => {
                MatcherError::Config(format!("root collection '{}' does not exist", key))
            }
            other => other,
        })
    }

    /// Every feature containing `point`, roots first, then each deeper tier
    /// in discovery order.
    pub fn match_point(&self, point: &Point<f64>) -> Result<Vec<Match>> {
        let mut queue = VecDeque::new();

        for root in &self.roots {
            let collection = self.load_root(root)?;
            if let Some(feature) = find_containing(&collection, point) {
                queue.push_back(Match {
                    tier: 0,
                    collection: root.clone(),
                    feature: Arc::clone(feature),
                });
            }
        }

        let mut results = Vec::new();
        while let Some(matched) = queue.pop_front() {
            for key in (self.expand)(&matched.feature, matched.tier) {
                let collection = match self.cache.load(&key) {
                    Ok(collection) => collection,
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e),
                };

                if let Some(feature) = find_containing(&collection, point) {
                    queue.push_back(Match {
                        tier: matched.tier + 1,
                        collection: key,
                        feature: Arc::clone(feature),
                    });
                }
            }
            results.push(matched);
        }

        Ok(results)
    }

    /// Convenience wrapper taking WGS84 longitude and latitude in degrees.
    pub fn match_lon_lat(&self, lon: f64, lat: f64) -> Result<Vec<Match>> {
        self.match_point(&Point::new(lon, lat))
    }

    /// Canonical identifiers of every match, in match order. Features without
    /// the identifier property are left out.
    pub fn match_identifiers(&self, point: &Point<f64>) -> Result<Vec<String>> {
        Ok(self
            .match_point(point)?
            .iter()
            .filter_map(|m| m.identifier(&self.identifier_property))
            .map(str::to_string)
            .collect())
    }
}

impl std::fmt::Debug for CascadingMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CascadingMatcher")
            .field("roots", &self.roots)
            .field("identifier_property", &self.identifier_property)
            .field("preload", &self.preload.len())
            .field("cache", &self.cache)
            .finish()
    }
}
