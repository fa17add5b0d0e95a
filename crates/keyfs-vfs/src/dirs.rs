//! Directory emulation over a flat blob store.
//!
//! No directory is ever stored. Whether a path is a file, a directory or
//! nothing is recomputed from two lookups on every call:
//!
//! 1. the object at the path's key, if any;
//! 2. a delimited listing of `key + "/"`, which finds descendant keys and the
//!    directory marker.
//!
//! A path with both an object and descendants is a directory. That priority
//! rule lives in [`classify`] and nowhere else, so changing the policy does
//! not touch handles or glob.

use std::collections::BTreeMap;

use keyfs_store::{BlobStore, ListRequest, ObjectMeta};
use tracing::debug;

use crate::error::{VfsError, VfsResult};
use crate::info::{FileInfo, FileKind};
use crate::path::{self, SEPARATOR};

/// Resolve what a path is from the evidence found in the store.
///
/// Children win over a leaf object at the same key.
pub fn classify(has_object: bool, has_children: bool) -> Option<FileKind> {
    match (has_object, has_children) {
        (_, true) => Some(FileKind::Directory),
        (true, false) => Some(FileKind::File),
        (false, false) => None,
    }
}

/// What the store holds at and below one name.
#[derive(Debug, Default)]
struct Evidence {
    object: Option<ObjectMeta>,
    has_children: bool,
}

impl Evidence {
    fn into_info(self, name: &str) -> Option<FileInfo> {
        match classify(self.object.is_some(), self.has_children)? {
            FileKind::Directory => Some(FileInfo::directory(name)),
            FileKind::File => self.object.map(|meta| FileInfo::file(name, &meta)),
        }
    }
}

/// Returns `true` if anything is stored below `path`, marker included.
pub fn has_children<S: BlobStore + ?Sized>(store: &S, path: &str) -> VfsResult<bool> {
    let request = ListRequest::new(path::dir_prefix(path))
        .delimited(SEPARATOR)
        .limit(1);
    Ok(!store.list(&request)?.is_empty())
}

/// Stat a path. The root always exists as a directory.
pub fn stat<S: BlobStore + ?Sized>(store: &S, path: &str) -> VfsResult<FileInfo> {
    if path::is_root(path) {
        return Ok(FileInfo::directory(path::ROOT));
    }

    let evidence = Evidence {
        object: store.head(&path::to_key(path))?,
        has_children: has_children(store, path)?,
    };
    let name = path::base_name(path);
    debug!(
        path,
        has_object = evidence.object.is_some(),
        has_children = evidence.has_children,
        "stat"
    );
    evidence
        .into_info(&name)
        .ok_or_else(|| VfsError::not_found(path::clean(path)))
}

/// List the immediate children of a directory, sorted by name.
pub fn read_dir<S: BlobStore + ?Sized>(store: &S, path: &str) -> VfsResult<Vec<FileInfo>> {
    let prefix = path::dir_prefix(path);
    let listing = store.list(&ListRequest::new(prefix.clone()).delimited(SEPARATOR))?;

    if listing.is_empty() && !path::is_root(path) {
        // Nothing below: either a plain file or nothing at all.
        return match stat(store, path) {
            Ok(info) if info.is_file() => Err(VfsError::NotADirectory {
                path: path::clean(path),
            }),
            Ok(_) => Ok(Vec::new()),
            Err(e) => Err(e),
        };
    }

    let mut by_name: BTreeMap<String, Evidence> = BTreeMap::new();
    for meta in listing.objects {
        let name = meta.key[prefix.len()..].to_string();
        // The directory's own marker.
        if name.is_empty() {
            continue;
        }
        by_name.entry(name).or_default().object = Some(meta);
    }
    for common in listing.common_prefixes {
        let name = common[prefix.len()..].trim_end_matches(SEPARATOR);
        if name.is_empty() {
            continue;
        }
        by_name.entry(name.to_string()).or_default().has_children = true;
    }

    Ok(by_name
        .into_iter()
        .filter_map(|(name, evidence)| evidence.into_info(&name))
        .collect())
}
