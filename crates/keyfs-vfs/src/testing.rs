use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;
use keyfs_store::{
    BlobStore, InMemoryBlobStore, ListRequest, Listing, Object, ObjectMeta, StoreError,
    StoreResult,
};

/// In-memory store whose deletes take effect only after a few reads.
///
/// Mimics an eventually consistent backend: a deleted key keeps answering
/// `get`/`head` with its old object for the next `lag` reads of that key.
pub(crate) struct LaggingStore {
    inner: InMemoryBlobStore,
    lag: usize,
    ghosts: Mutex<HashMap<String, (Object, usize)>>,
}

impl LaggingStore {
    pub(crate) fn new(lag: usize) -> Self {
        Self {
            inner: InMemoryBlobStore::new(),
            lag,
            ghosts: Mutex::new(HashMap::new()),
        }
    }
}

impl BlobStore for LaggingStore {
    fn put(&self, key: &str, data: Bytes) -> StoreResult<ObjectMeta> {
        self.ghosts
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(key);
        self.inner.put(key, data)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Object>> {
        let mut ghosts = self.ghosts.lock().map_err(|_| StoreError::LockPoisoned)?;
        if let Some((object, remaining)) = ghosts.get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(Some(object.clone()));
            }
            ghosts.remove(key);
        }
        self.inner.get(key)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        if let Some(object) = self.inner.get(key)? {
            self.ghosts
                .lock()
                .map_err(|_| StoreError::LockPoisoned)?
                .insert(key.to_string(), (object, self.lag));
        }
        self.inner.delete(key)
    }

    fn list(&self, request: &ListRequest) -> StoreResult<Listing> {
        self.inner.list(request)
    }
}
