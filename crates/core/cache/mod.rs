//! Bounded cache of parsed feature collections.
//!
//! Collections are parsed from the backing store on first reference and kept
//! in a strict LRU with a fixed number of slots shared by every key.
//!
//! # Concurrency
//!
//! ```text
//! load("sldl/06") ─┐
//!                  │   miss     ┌──────────────┐
//! load("sldl/06") ─┼──────────► │ in-flight    │ ──► one store read + parse
//!                  │            │ slot per key │
//! load("sldl/06") ─┘            └──────────────┘
//!                                      │
//!                          all callers receive the same Arc
//! ```
//!
//! Hits share a read lock and bump recency with an atomic stamp, so concurrent
//! hits never exclude each other. Only publishing a freshly parsed collection
//! takes the write lock. Misses for different keys parse in parallel; misses
//! for the same key wait on a single `OnceCell` so the document is read once.

use crate::compute::geojson::parse_collection;
use crate::error::{MatcherError, Result};
use crate::feature::FeatureCollection;
use crate::storage::CollectionStore;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

mod lru;

use lru::LruMap;

type LoadSlot = Arc<OnceCell<Result<Arc<FeatureCollection>>>>;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    /// Lookups answered from a resident collection
    pub hits: u64,
    /// Lookups that found no resident collection
    pub misses: u64,
    /// Documents read and parsed into a collection
    pub loads: u64,
    /// Lookups for keys with no backing document
    pub not_found: u64,
    /// Misses that waited on another caller's load
    pub coalesced: u64,
    /// Collections dropped to stay within capacity
    pub evictions: u64,
    pub resident: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served without touching the store.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    not_found: AtomicU64,
    coalesced: AtomicU64,
    evictions: AtomicU64,
}

/// LRU cache of feature collections keyed by collection name.
///
/// Thread-safe; share it behind an `Arc` between query threads or construct
/// one per worker.
pub struct CollectionCache {
    store: Arc<dyn CollectionStore>,
    resident: RwLock<LruMap<FeatureCollection>>,
    in_flight: DashMap<String, LoadSlot>,
    capacity: usize,
    counters: Counters,
}

impl CollectionCache {
    /// Create a cache holding at most `capacity` collections.
    pub fn new(store: Arc<dyn CollectionStore>, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MatcherError::Config(
                "Cache capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            store,
            resident: RwLock::new(LruMap::new(capacity)),
            in_flight: DashMap::new(),
            capacity,
            counters: Counters::default(),
        })
    }

    /// Return the collection for `key`, reading it from the store if it is
    /// not resident.
    ///
    /// Fails with [`MatcherError::NotFound`] when the store has no document
    /// for the key. Absent keys are not cached.
    pub fn load(&self, key: &str) -> Result<Arc<FeatureCollection>> {
        if let Some(collection) = self.resident.read().get(key) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(collection);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let slot = self
            .in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let mut leader = false;
        let outcome = slot
            .get_or_init(|| {
                leader = true;
                self.fetch(key)
            })
            .clone();

        if leader {
            self.in_flight
                .remove_if(key, |_, current| Arc::ptr_eq(current, &slot));
        } else {
            self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
            log::debug!("Coalesced load of '{}' with an in-flight read", key);
        }

        outcome
    }

    fn fetch(&self, key: &str) -> Result<Arc<FeatureCollection>> {
        // Another leader may have published this key after our resident check.
        if let Some(collection) = self.resident.read().get(key) {
            return Ok(collection);
        }

        let started = Instant::now();
        let bytes = match self.store.read(key) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.is_not_found() {
                    self.counters.not_found.fetch_add(1, Ordering::Relaxed);
                }
                return Err(e);
            }
        };

        let collection = Arc::new(parse_collection(key, &bytes)?);
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "Loaded collection '{}' ({} features) in {:.1?}",
            key,
            collection.len(),
            started.elapsed()
        );

        let evicted = self
            .resident
            .write()
            .insert(key.to_string(), Arc::clone(&collection));

        if !evicted.is_empty() {
            self.counters
                .evictions
                .fetch_add(evicted.len() as u64, Ordering::Relaxed);
            for old in &evicted {
                log::debug!("Evicted collection '{}'", old);
            }
        }

        Ok(collection)
    }

    /// Whether `key` is resident, without refreshing its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.resident.read().peek(key).is_some()
    }

    /// Resident keys from least to most recently used.
    pub fn resident_keys(&self) -> Vec<String> {
        self.resident.read().keys()
    }

    pub fn len(&self) -> usize {
        self.resident.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            not_found: self.counters.not_found.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            resident: self.len(),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for CollectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionCache")
            .field("capacity", &self.capacity)
            .field("resident", &self.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}
