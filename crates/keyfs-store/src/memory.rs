use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::object::{ListRequest, Listing, Object, ObjectMeta};
use crate::traits::BlobStore;

/// In-memory, `BTreeMap`-based blob store.
///
/// Keys are kept ordered so a prefix listing is a range scan. Reads and
/// writes are immediately consistent. Data is lost when the store is dropped.
pub struct InMemoryBlobStore {
    objects: RwLock<BTreeMap<String, Object>>,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.read_map().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return all keys in order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.read_map()?.keys().cloned().collect())
    }

    /// Remove all objects from the store.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_map()?.clear();
        Ok(())
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Object>>> {
        self.objects.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Object>>> {
        self.objects.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, key: &str, data: Bytes) -> StoreResult<ObjectMeta> {
        let object = Object::new(key, data);
        let meta = object.meta.clone();
        self.write_map()?.insert(key.to_string(), object);
        Ok(meta)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Object>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.write_map()?.remove(key);
        Ok(())
    }

    fn list(&self, request: &ListRequest) -> StoreResult<Listing> {
        let map = self.read_map()?;
        let candidates = map
            .range(request.prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&request.prefix))
            .map(|(_, object)| object.meta.clone());
        Ok(Listing::from_sorted(request, candidates))
    }

    fn head(&self, key: &str) -> StoreResult<Option<ObjectMeta>> {
        Ok(self.read_map()?.get(key).map(|object| object.meta.clone()))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("object_count", &self.len())
            .finish()
    }
}
