//! Read and write handles over single objects.
//!
//! The store has no partial writes, so a [`WriteHandle`] buffers everything
//! client-side and commits it with one put on [`close`](WriteHandle::close).
//! A [`ReadHandle`] holds the full body fetched at open time.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use bytes::Bytes;
use keyfs_store::BlobStore;
use tracing::{debug, warn};

use crate::error::VfsResult;
use crate::info::FileInfo;

/// A handle whose buffered contents become visible only when closed.
pub trait FileWriter: Write {
    /// Commit the buffered bytes as the file's full contents.
    fn close(self) -> VfsResult<FileInfo>;
}

// ---------------------------------------------------------------------------
// ReadHandle
// ---------------------------------------------------------------------------

/// Readable, seekable view of one committed object.
#[derive(Debug)]
pub struct ReadHandle {
    info: FileInfo,
    cursor: Cursor<Bytes>,
}

impl ReadHandle {
    pub fn new(info: FileInfo, data: Bytes) -> Self {
        Self {
            info,
            cursor: Cursor::new(data),
        }
    }

    /// Metadata of the object as of open time.
    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    /// The whole body, independent of the read position.
    pub fn as_bytes(&self) -> &Bytes {
        self.cursor.get_ref()
    }

    pub fn into_bytes(self) -> Bytes {
        self.cursor.into_inner()
    }
}

impl Read for ReadHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for ReadHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

// ---------------------------------------------------------------------------
// WriteHandle
// ---------------------------------------------------------------------------

/// Buffered writer for one key.
///
/// Writes never fail and never reach the store; `flush` does not commit.
/// Dropping the handle without closing it discards the buffer and leaves the
/// stored object untouched.
pub struct WriteHandle<S: BlobStore> {
    store: Arc<S>,
    key: String,
    name: String,
    buffer: Vec<u8>,
    closed: bool,
}

impl<S: BlobStore> WriteHandle<S> {
    pub(crate) fn new(store: Arc<S>, key: String, name: String) -> Self {
        Self {
            store,
            key,
            name,
            buffer: Vec::new(),
            closed: false,
        }
    }

    /// The key the handle commits to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bytes buffered so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<S: BlobStore> Write for WriteHandle<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: BlobStore> FileWriter for WriteHandle<S> {
    fn close(mut self) -> VfsResult<FileInfo> {
        self.closed = true;
        let data = Bytes::from(std::mem::take(&mut self.buffer));
        let meta = self.store.put(&self.key, data)?;
        debug!(key = %self.key, size = meta.size, "committed object");
        Ok(FileInfo::file(self.name.as_str(), &meta))
    }
}

impl<S: BlobStore> Drop for WriteHandle<S> {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                key = %self.key,
                discarded = self.buffer.len(),
                "write handle dropped without close"
            );
        }
    }
}

impl<S: BlobStore> std::fmt::Debug for WriteHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteHandle")
            .field("key", &self.key)
            .field("buffered", &self.buffer.len())
            .field("closed", &self.closed)
            .finish()
    }
}
