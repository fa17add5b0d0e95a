//! The [`FileSystem`] trait: the capability set shared by every filesystem.
//!
//! [`mkdir_all`](crate::mkdir_all) and [`glob`](crate::glob()) are written
//! against this trait only, so any implementation with the same semantics can
//! stand in for the store-backed [`ObjectFs`](crate::ObjectFs).

use std::io::{Read, Write};

use crate::error::VfsResult;
use crate::handle::FileWriter;
use crate::info::FileInfo;
use crate::path;

/// Hierarchical read-write filesystem.
///
/// Paths are slash-separated and cleaned before use; `"."`, `"/"` and `""`
/// all name the root.
pub trait FileSystem {
    /// Handle returned by [`open`](FileSystem::open).
    type Reader: Read;
    /// Handle returned by [`create`](FileSystem::create).
    type Writer: FileWriter;

    /// Open a file for reading.
    ///
    /// Fails with a not-found error if no object exists at the path.
    fn open(&self, path: &str) -> VfsResult<Self::Reader>;

    /// Create or replace a file. Contents become visible when the writer is
    /// closed.
    fn create(&self, path: &str) -> VfsResult<Self::Writer>;

    /// Create a single directory whose parent already exists.
    fn mkdir(&self, path: &str) -> VfsResult<()>;

    /// Remove a file, or an empty directory. Never cascades.
    fn remove(&self, path: &str) -> VfsResult<()>;

    /// Describe a path.
    fn stat(&self, path: &str) -> VfsResult<FileInfo>;

    /// List the immediate children of a directory, sorted by name.
    fn read_dir(&self, path: &str) -> VfsResult<Vec<FileInfo>>;

    /// Join path elements the way this filesystem spells paths.
    fn join(&self, elems: &[&str]) -> String {
        path::join(elems)
    }

    /// Returns `Ok(false)` only for the not-found condition.
    fn exists(&self, path: &str) -> VfsResult<bool> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Read a whole file.
    fn read_file(&self, path: &str) -> VfsResult<Vec<u8>> {
        let mut reader = self.open(path)?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Replace a whole file in one commit.
    fn write_file(&self, path: &str, data: &[u8]) -> VfsResult<FileInfo> {
        let mut writer = self.create(path)?;
        writer.write_all(data)?;
        writer.close()
    }
}
