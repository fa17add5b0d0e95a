use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::object::{ListRequest, Listing, Object, ObjectMeta};
use crate::traits::BlobStore;

/// Longest key accepted, in bytes. Two hex digits per byte must fit in one
/// file name component.
pub const MAX_KEY_LEN: usize = 127;

/// Blob store rooted at a local directory, one file per object.
///
/// File names are the hex encoding of the key, so the layout stays flat and
/// `a/b` can sit next to `a/b/c`. Hex encoding preserves prefixes, which lets
/// a listing filter file names before decoding them.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened local blob store");
        Ok(Self { root })
    }

    /// The directory holding the objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_key(key: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
                reason: "key must not be empty".into(),
            });
        }
        if key.len() > MAX_KEY_LEN {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
                reason: format!("key longer than {MAX_KEY_LEN} bytes"),
            });
        }
        Ok(())
    }

    /// File backing `key`, or `None` for a key that can never be stored.
    fn object_path(&self, key: &str) -> Option<PathBuf> {
        Self::check_key(key).ok()?;
        Some(self.root.join(hex::encode(key)))
    }

    fn meta_for(key: &str, metadata: &std::fs::Metadata) -> StoreResult<ObjectMeta> {
        Ok(ObjectMeta {
            key: key.to_string(),
            size: metadata.len(),
            last_modified: DateTime::<Utc>::from(metadata.modified()?),
        })
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, key: &str, data: Bytes) -> StoreResult<ObjectMeta> {
        Self::check_key(key)?;
        let target = self.root.join(hex::encode(key));

        // Stage next to the target so the rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(&self.root)?;
        staged.write_all(&data)?;
        staged.as_file().sync_all()?;
        let file = staged.persist(&target).map_err(|e| e.error)?;

        let meta = Self::meta_for(key, &file.metadata()?)?;
        debug!(key, size = meta.size, "local put");
        Ok(meta)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Object>> {
        let Some(path) = self.object_path(key) else {
            return Ok(None);
        };
        // Contents and metadata come from the same handle.
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let metadata = file.metadata()?;
        let mut data = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut data)?;
        Ok(Some(Object {
            meta: Self::meta_for(key, &metadata)?,
            data: Bytes::from(data),
        }))
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let Some(path) = self.object_path(key) else {
            return Ok(());
        };
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, request: &ListRequest) -> StoreResult<Listing> {
        let hex_prefix = hex::encode(&request.prefix);
        let mut metas = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            // Staging files and anything else that is not ours.
            if !name.starts_with(&hex_prefix) || name.starts_with('.') {
                continue;
            }
            let key = match hex::decode(name).map(String::from_utf8) {
                Ok(Ok(key)) => key,
                _ => {
                    warn!(file = name, "skipping undecodable entry in blob store");
                    continue;
                }
            };
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                // Deleted between read_dir and stat.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            metas.push(Self::meta_for(&key, &metadata)?);
        }

        metas.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(Listing::from_sorted(request, metas))
    }

    fn head(&self, key: &str) -> StoreResult<Option<ObjectMeta>> {
        let Some(path) = self.object_path(key) else {
            return Ok(None);
        };
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(Some(Self::meta_for(key, &metadata)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
