use std::sync::Arc;

use bytes::Bytes;
use keyfs_store::{BlobStore, ListRequest};
use tracing::debug;

use crate::dirs;
use crate::error::{VfsError, VfsResult};
use crate::handle::{ReadHandle, WriteHandle};
use crate::info::FileInfo;
use crate::path::{self, SEPARATOR};
use crate::traits::FileSystem;

/// A [`FileSystem`] backed by a flat [`BlobStore`].
///
/// Holds no state besides the store handle: every call goes to the store, so
/// clones can be shared freely across threads. Directories are derived on
/// each call and never cached.
pub struct ObjectFs<S: BlobStore> {
    store: Arc<S>,
}

impl<S: BlobStore> ObjectFs<S> {
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: BlobStore> Clone for ObjectFs<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BlobStore + std::fmt::Debug> std::fmt::Debug for ObjectFs<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectFs").field("store", &self.store).finish()
    }
}

impl<S: BlobStore> FileSystem for ObjectFs<S> {
    type Reader = ReadHandle;
    type Writer = WriteHandle<S>;

    fn open(&self, path: &str) -> VfsResult<ReadHandle> {
        if path::is_root(path) {
            return Err(VfsError::IsADirectory {
                path: path::ROOT.into(),
            });
        }
        match self.store.get(&path::to_key(path))? {
            Some(object) => {
                let info = FileInfo::file(path::base_name(path), &object.meta);
                Ok(ReadHandle::new(info, object.data))
            }
            None => Err(VfsError::not_found(path::clean(path))),
        }
    }

    fn create(&self, path: &str) -> VfsResult<WriteHandle<S>> {
        if path::is_root(path) {
            return Err(VfsError::IsADirectory {
                path: path::ROOT.into(),
            });
        }
        Ok(WriteHandle::new(
            Arc::clone(&self.store),
            path::to_key(path),
            path::base_name(path),
        ))
    }

    fn mkdir(&self, path: &str) -> VfsResult<()> {
        let cleaned = path::clean(path);
        if self.exists(&cleaned)? {
            return Err(VfsError::AlreadyExists { path: cleaned });
        }

        let (parent, _) = path::split(&cleaned);
        if !self.stat(&parent)?.is_dir() {
            return Err(VfsError::NotADirectory { path: parent });
        }

        let marker = path::dir_prefix(&cleaned);
        self.store.put(&marker, Bytes::new())?;
        debug!(path = %cleaned, marker = %marker, "wrote directory marker");
        Ok(())
    }

    fn remove(&self, path: &str) -> VfsResult<()> {
        if path::is_root(path) {
            return Err(VfsError::InvalidPath {
                path: path::ROOT.into(),
                reason: "the root cannot be removed".into(),
            });
        }

        let key = path::to_key(path);
        if self.store.head(&key)?.is_some() {
            // Only the leaf object goes; descendants keep the path a directory.
            self.store.delete(&key)?;
            debug!(key = %key, "removed object");
            return Ok(());
        }

        // No object: this is a directory, or nothing. The marker sorts first.
        let marker = path::dir_prefix(path);
        let below = self
            .store
            .list(&ListRequest::new(marker.clone()).delimited(SEPARATOR).limit(2))?;
        if below.is_empty() {
            return Ok(());
        }
        let only_marker = below.common_prefixes.is_empty()
            && below.objects.len() == 1
            && below.objects[0].key == marker;
        if !only_marker {
            return Err(VfsError::DirectoryNotEmpty { path: key });
        }
        self.store.delete(&marker)?;
        debug!(path = %key, "removed empty directory");
        Ok(())
    }

    fn stat(&self, path: &str) -> VfsResult<FileInfo> {
        dirs::stat(self.store.as_ref(), path)
    }

    fn read_dir(&self, path: &str) -> VfsResult<Vec<FileInfo>> {
        dirs::read_dir(self.store.as_ref(), path)
    }
}
