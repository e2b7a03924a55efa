//! Configuration for the district matcher.
//!
//! Describes where collections live, how many may be resident at once, and
//! which collections and properties drive the cascade.
use serde::de::Error;
use std::path::{Component, Path, PathBuf};

/// Matcher configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Directory holding `<key>.geojson` documents
    #[serde(default = "MatcherConfig::default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum number of resident collections
    #[serde(default = "MatcherConfig::default_cache_capacity")]
    pub cache_capacity: usize,

    /// Collections probed first for every query
    #[serde(default = "MatcherConfig::default_roots")]
    pub roots: Vec<String>,

    /// Layer prefixes probed for a root match, in result order
    #[serde(default = "MatcherConfig::default_layers")]
    pub layers: Vec<String>,

    /// Root feature property holding the region code (state FIPS)
    #[serde(default = "MatcherConfig::default_region_property")]
    pub region_property: String,

    /// Feature property holding the canonical district identifier
    #[serde(default = "MatcherConfig::default_identifier_property")]
    pub identifier_property: String,

    /// Load every `layer/region` collection during warm-up
    #[serde(default)]
    pub preload: bool,

    /// Region codes considered for preloading
    #[serde(default)]
    pub regions: Vec<String>,
}

impl MatcherConfig {
    const fn default_cache_capacity() -> usize {
        512
    }

    fn default_data_dir() -> PathBuf {
        PathBuf::from("out")
    }

    fn default_roots() -> Vec<String> {
        vec!["states/states".to_string()]
    }

    fn default_layers() -> Vec<String> {
        ["congress", "sldl", "sldu"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_region_property() -> String {
        "STATEFP".to_string()
    }

    fn default_identifier_property() -> String {
        "OCDID".to_string()
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Cache capacity must be greater than zero");

        if capacity > 10_000 {
            log::warn!(
                "Cache capacity of {} is very large; every resident collection keeps its \
                full geometry in memory.",
                capacity
            );
        }

        self.cache_capacity = capacity;
        self
    }

    pub fn with_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_region_property(mut self, property: impl Into<String>) -> Self {
        self.region_property = property.into();
        self
    }

    pub fn with_identifier_property(mut self, property: impl Into<String>) -> Self {
        self.identifier_property = property.into();
        self
    }

    pub fn with_preload<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preload = true;
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cache_capacity == 0 {
            return Err("Cache capacity must be greater than zero".to_string());
        }

        if self.roots.is_empty() {
            return Err("At least one root collection is required".to_string());
        }

        if self.roots.iter().chain(&self.layers).any(|k| k.is_empty()) {
            return Err("Collection names must not be empty".to_string());
        }

        if let Some(name) = self
            .roots
            .iter()
            .chain(&self.layers)
            .find(|k| !is_relative_name(k))
        {
            return Err(format!(
                "Collection name '{}' must be a relative path inside the data directory",
                name
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: MatcherConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: MatcherConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn is_relative_name(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            cache_capacity: Self::default_cache_capacity(),
            roots: Self::default_roots(),
            layers: Self::default_layers(),
            region_property: Self::default_region_property(),
            identifier_property: Self::default_identifier_property(),
            preload: false,
            regions: Vec::new(),
        }
    }
}
