use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::local::LocalBlobStore;
use crate::memory::InMemoryBlobStore;
use crate::object::{ListRequest, Listing, Object, ObjectMeta};
use crate::traits::BlobStore;

/// Default directory for the local backend.
pub const DEFAULT_LOCAL_ROOT: &str = ".keyfs";

/// Which backend to open, and where.
///
/// ```toml
/// backend = "local"
/// root = "/var/lib/keyfs"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Process-local store; contents vanish on exit.
    Memory,
    /// One file per object under `root`.
    Local { root: PathBuf },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Local {
            root: PathBuf::from(DEFAULT_LOCAL_ROOT),
        }
    }
}

impl StoreConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Open the configured backend.
    pub fn open(&self) -> StoreResult<ConfiguredStore> {
        match self {
            Self::Memory => Ok(ConfiguredStore::Memory(InMemoryBlobStore::new())),
            Self::Local { root } => Ok(ConfiguredStore::Local(LocalBlobStore::open(root)?)),
        }
    }
}

/// A backend selected at runtime from a [`StoreConfig`].
#[derive(Debug)]
pub enum ConfiguredStore {
    Memory(InMemoryBlobStore),
    Local(LocalBlobStore),
}

impl BlobStore for ConfiguredStore {
    fn put(&self, key: &str, data: Bytes) -> StoreResult<ObjectMeta> {
        match self {
            Self::Memory(store) => store.put(key, data),
            Self::Local(store) => store.put(key, data),
        }
    }

    fn get(&self, key: &str) -> StoreResult<Option<Object>> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::Local(store) => store.get(key),
        }
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.delete(key),
            Self::Local(store) => store.delete(key),
        }
    }

    fn list(&self, request: &ListRequest) -> StoreResult<Listing> {
        match self {
            Self::Memory(store) => store.list(request),
            Self::Local(store) => store.list(request),
        }
    }

    fn head(&self, key: &str) -> StoreResult<Option<ObjectMeta>> {
        match self {
            Self::Memory(store) => store.head(key),
            Self::Local(store) => store.head(key),
        }
    }
}
