use chrono::{DateTime, Utc};
use keyfs_store::ObjectMeta;
use serde::Serialize;

/// Whether a path is a regular file or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Backed by an object stored at the path's key.
    File,
    /// Has descendant keys or a directory marker. Never a stored object.
    Directory,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Metadata derived for one path. Never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Final path segment.
    pub name: String,
    pub kind: FileKind,
    /// Object size in bytes; `0` for directories.
    pub size: u64,
    /// Last commit time of the object. Directories have none.
    pub modified: Option<DateTime<Utc>>,
}

impl FileInfo {
    /// Info for a regular file backed by `meta`.
    pub fn file(name: impl Into<String>, meta: &ObjectMeta) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::File,
            size: meta.size,
            modified: Some(meta.last_modified),
        }
    }

    /// Info for a synthetic directory.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Directory,
            size: 0,
            modified: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}
