use bytes::Bytes;

use crate::error::StoreResult;
use crate::object::{ListRequest, Listing, Object, ObjectMeta};

/// Flat key/value blob store with prefix listing.
///
/// All implementations must satisfy these invariants:
/// - One key addresses one object; keys are opaque strings.
/// - `put` replaces the whole object in one step. There is no partial or
///   append write; readers see either the old body or the new one.
/// - `delete` of a missing key succeeds.
/// - Listings may lag behind writes on eventually consistent backends.
/// - All I/O errors are propagated, never silently ignored or retried.
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous object.
    fn put(&self, key: &str, data: Bytes) -> StoreResult<ObjectMeta>;

    /// Fetch an object.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<Object>>;

    /// Delete an object. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// List keys by prefix, optionally grouped by a delimiter.
    fn list(&self, request: &ListRequest) -> StoreResult<Listing>;

    /// Fetch only the metadata of an object.
    ///
    /// Default implementation calls `get()` and drops the body. Backends may
    /// override to avoid transferring the payload.
    fn head(&self, key: &str) -> StoreResult<Option<ObjectMeta>> {
        Ok(self.get(key)?.map(|object| object.meta))
    }
}

impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn put(&self, key: &str, data: Bytes) -> StoreResult<ObjectMeta> {
        (**self).put(key, data)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Object>> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn list(&self, request: &ListRequest) -> StoreResult<Listing> {
        (**self).list(request)
    }

    fn head(&self, key: &str) -> StoreResult<Option<ObjectMeta>> {
        (**self).head(key)
    }
}
