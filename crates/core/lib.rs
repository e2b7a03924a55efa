//! Resolve a longitude/latitude to the administrative districts containing it.
//!
//! ## Features
//! - **Cascading lookup**: root collections (state boundaries) are probed first;
//!   each match names the next collections to probe (congressional and state
//!   legislative districts for that state)
//! - **Bounded memory**: collections load on first use into a strict LRU cache
//!   with a fixed number of slots
//! - **Load coalescing**: concurrent misses for the same collection share one
//!   read and parse
//! - **Expected absences**: a derived collection with no backing document is
//!   skipped; a corrupt document fails the query
//!
//! ```rust
//! use district_matcher::{CascadingMatcher, MemoryStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert(
//!     "states/states",
//!     r#"{"type":"FeatureCollection","features":[{"type":"Feature",
//!         "properties":{"STATEFP":"06","OCDID":"ocd-division/country:us/state:ca"},
//!         "geometry":{"type":"Polygon","coordinates":[[[-125,24],[-66,24],[-66,49],[-125,49],[-125,24]]]}}]}"#,
//! );
//!
//! let matcher = CascadingMatcher::builder().store(store).build()?;
//! let ids = matcher.match_identifiers(&(-122.4, 37.8).into())?;
//! assert_eq!(ids, vec!["ocd-division/country:us/state:ca"]);
//! # Ok::<(), district_matcher::MatcherError>(())
//! ```

pub mod builder;
pub mod cache;
pub mod compute;
pub mod config;
pub mod error;
pub mod feature;
pub mod matcher;
pub mod storage;

pub use builder::MatcherBuilder;
pub use cache::{CacheStats, CollectionCache};
pub use config::MatcherConfig;
pub use error::{MatcherError, Result};
pub use feature::{Feature, FeatureCollection};
pub use matcher::{CascadingMatcher, ExpansionRule, Match, district_expansion};
pub use storage::{CollectionStore, FileStore, MemoryStore};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        CascadingMatcher, CollectionCache, Match, MatcherBuilder, MatcherConfig, MatcherError,
        Result,
    };

    pub use crate::{CollectionStore, FileStore, MemoryStore};

    pub use geo::Point;
}
