//! Backing stores for collection documents.
//!
//! A store resolves a collection key to the raw bytes of its GeoJSON document.
//! The cache only ever reads through this trait, so collections can come from
//! a data directory or from memory without the matcher knowing.

use crate::error::{MatcherError, Result};
use std::path::{Component, Path, PathBuf};

mod memory;

pub use memory::MemoryStore;

/// Trait for backing store implementations
pub trait CollectionStore: Send + Sync {
    /// Read the document for `key`.
    ///
    /// Returns [`MatcherError::NotFound`] when no document exists for the key;
    /// any other error means the document exists but could not be read.
    fn read(&self, key: &str) -> Result<Vec<u8>>;
}

/// Store resolving `key` to `<root>/<key>.geojson`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub const EXTENSION: &'static str = "geojson";

    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its document path. Keys are relative, `/`-separated and
    /// may not climb out of the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let well_formed = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !well_formed {
            return Err(MatcherError::InvalidInput(format!(
                "invalid collection key '{}'",
                key
            )));
        }

        let mut path = self.root.join(relative);
        let file_name = format!(
            "{}.{}",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Self::EXTENSION
        );
        path.set_file_name(file_name);
        Ok(path)
    }
}

impl CollectionStore for FileStore {
    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MatcherError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
