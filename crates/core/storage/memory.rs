//! In-memory collection store.

use super::CollectionStore;
use crate::error::{MatcherError, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Store holding documents in a HashMap, counting every read.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<FxHashMap<String, Arc<[u8]>>>,
    reads: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the document for `key`.
    pub fn insert(&self, key: impl Into<String>, document: impl AsRef<[u8]>) {
        self.documents
            .write()
            .insert(key.into(), Arc::from(document.as_ref()));
    }

    pub fn remove(&self, key: &str) -> bool {
        self.documents.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Number of successful document reads so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl CollectionStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let document = self
            .documents
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| MatcherError::NotFound(key.to_string()))?;

        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(document.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_read_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.insert("states", b"{}");
        assert_eq!(store.len(), 1);
        assert_eq!(store.read("states").unwrap(), b"{}");
        assert_eq!(store.reads(), 1);

        assert!(store.remove("states"));
        assert!(store.read("states").unwrap_err().is_not_found());
        assert_eq!(store.reads(), 1);
    }
}
