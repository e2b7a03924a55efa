//! Matcher builder for flexible configuration
//!
//! Assembles a [`CascadingMatcher`] from a [`MatcherConfig`], optionally with
//! a custom store, a shared cache, or a different expansion rule.

use crate::cache::CollectionCache;
use crate::config::MatcherConfig;
use crate::error::{MatcherError, Result};
use crate::matcher::{CascadingMatcher, ExpansionRule, district_expansion, preload_keys};
use crate::storage::{CollectionStore, FileStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for a matcher with custom data location, cache and cascade rule.
pub struct MatcherBuilder {
    config: MatcherConfig,
    store: Option<Arc<dyn CollectionStore>>,
    cache: Option<Arc<CollectionCache>>,
    expansion: Option<ExpansionRule>,
    warm_up: bool,
}

impl MatcherBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
            store: None,
            cache: None,
            expansion: None,
            warm_up: false,
        }
    }

    /// Set the matcher configuration.
    pub fn config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Read `<key>.geojson` documents from this directory.
    pub fn data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config = self.config.with_data_dir(dir);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_cache_capacity(capacity);
        self
    }

    /// Read documents from a custom store instead of the data directory.
    pub fn store(mut self, store: Arc<dyn CollectionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Share an existing cache. Its store and capacity take precedence.
    pub fn cache(mut self, cache: Arc<CollectionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the district cascade with a custom rule.
    pub fn expansion(mut self, rule: ExpansionRule) -> Self {
        self.expansion = Some(rule);
        self
    }

    /// Load roots (and preload collections) while building.
    pub fn warm_up(mut self, enabled: bool) -> Self {
        self.warm_up = enabled;
        self
    }

    /// Build the matcher.
    pub fn build(self) -> Result<CascadingMatcher> {
        self.config.validate().map_err(MatcherError::Config)?;
        let config = self.config;

        let cache = match self.cache {
            Some(cache) => cache,
            None => {
                let store = self
                    .store
                    .unwrap_or_else(|| Arc::new(FileStore::new(config.data_dir.clone())));
                Arc::new(CollectionCache::new(store, config.cache_capacity)?)
            }
        };

        let expansion = self.expansion.unwrap_or_else(|| {
            district_expansion(config.layers.clone(), config.region_property.clone())
        });

        let preload = if config.preload {
            preload_keys(&config.layers, &config.regions)
        } else {
            Vec::new()
        };

        let matcher = CascadingMatcher::new(
            cache,
            config.roots,
            expansion,
            config.identifier_property,
        )
        .with_preload(preload);

        if self.warm_up {
            matcher.warm_up()?;
        }

        Ok(matcher)
    }
}

impl Default for MatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherBuilder")
            .field("config", &self.config)
            .field("custom_store", &self.store.is_some())
            .field("shared_cache", &self.cache.is_some())
            .field("custom_expansion", &self.expansion.is_some())
            .field("warm_up", &self.warm_up)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = MatcherConfig::default();
        config.roots.clear();

        let err = MatcherBuilder::new().config(config).build().unwrap_err();
        assert!(matches!(err, MatcherError::Config(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let matcher = MatcherBuilder::new().cache_capacity(4).build().unwrap();

        assert_eq!(matcher.roots(), ["states/states"]);
        assert_eq!(matcher.identifier_property(), "OCDID");
        assert_eq!(matcher.cache().capacity(), 4);
    }

    #[test]
    fn test_builder_shares_cache() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(CollectionCache::new(store, 2).unwrap());

        let a = MatcherBuilder::new().cache(cache.clone()).build().unwrap();
        let b = MatcherBuilder::new().cache(cache.clone()).build().unwrap();

        assert!(Arc::ptr_eq(a.cache(), b.cache()));
        assert_eq!(a.cache().capacity(), 2);
    }

    #[test]
    fn test_warm_up_on_build_requires_roots() {
        let err = MatcherBuilder::new()
            .store(Arc::new(MemoryStore::new()))
            .warm_up(true)
            .build()
            .unwrap_err();

        assert!(matches!(err, MatcherError::Config(_)));
    }
}
