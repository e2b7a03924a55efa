//! Recency bookkeeping for resident collections.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

struct Slot<V> {
    value: Arc<V>,
    stamp: AtomicU64,
}

/// Strict LRU map with a fixed capacity.
///
/// Every access takes a fresh stamp from a shared atomic clock, so lookups only
/// need `&self` and may run concurrently under a read lock. The slot with the
/// smallest stamp is always the least recently used one; insertion scans for
/// it, which is linear in the capacity.
pub(crate) struct LruMap<V> {
    slots: FxHashMap<String, Slot<V>>,
    clock: AtomicU64,
    capacity: usize,
}

impl<V> LruMap<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: FxHashMap::default(),
            clock: AtomicU64::new(0),
            capacity,
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Look up `key`, marking it most recently used.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<V>> {
        let slot = self.slots.get(key)?;
        // fetch_max: a racing older access must not move the stamp backwards
        slot.stamp.fetch_max(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&slot.value))
    }

    /// Look up `key` without touching its recency.
    pub(crate) fn peek(&self, key: &str) -> Option<&Arc<V>> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Insert `value` as most recently used and return the keys evicted to
    /// stay within capacity.
    pub(crate) fn insert(&mut self, key: String, value: Arc<V>) -> Vec<String> {
        let stamp = AtomicU64::new(self.tick());
        self.slots.insert(key, Slot { value, stamp });

        let mut evicted = Vec::new();
        while self.slots.len() > self.capacity {
            let Some(oldest) = self.oldest() else {
                break;
            };
            self.slots.remove(&oldest);
            evicted.push(oldest);
        }
        evicted
    }

    fn oldest(&self) -> Option<String> {
        self.slots
            .iter()
            .min_by_key(|(_, slot)| slot.stamp.load(Ordering::Relaxed))
            .map(|(key, _)| key.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Resident keys from least to most recently used.
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut stamped: Vec<_> = self
            .slots
            .iter()
            .map(|(key, slot)| (slot.stamp.load(Ordering::Relaxed), key.clone()))
            .collect();
        stamped.sort_unstable_by_key(|(stamp, _)| *stamp);
        stamped.into_iter().map(|(_, key)| key).collect()
    }
}
