use std::io;

use keyfs_store::StoreError;
use thiserror::Error;

/// Errors that can occur during filesystem operations.
///
/// A path that is both an object and a prefix of other keys is not an error;
/// it resolves to a directory.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Neither an object nor any descendant exists at the path.
    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    /// A directory operation reached a regular file.
    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// A file operation reached a directory.
    #[error("is a directory: {path}")]
    IsADirectory { path: String },

    /// The path already exists.
    #[error("file exists: {path}")]
    AlreadyExists { path: String },

    /// Removing the path would orphan descendant keys.
    #[error("directory not empty: {path}")]
    DirectoryNotEmpty { path: String },

    /// The path cannot be used for this operation.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A glob pattern segment failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Failure reported by the blob store, passed through unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error while reading or writing a handle.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl VfsError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Returns `true` for the not-exist condition.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<VfsError> for io::Error {
    fn from(err: VfsError) -> Self {
        match err {
            VfsError::Io(e) | VfsError::Store(StoreError::Io(e)) => e,
            other => {
                let kind = match &other {
                    VfsError::NotFound { .. } => io::ErrorKind::NotFound,
                    VfsError::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
                    VfsError::InvalidPath { .. } | VfsError::InvalidPattern { .. } => {
                        io::ErrorKind::InvalidInput
                    }
                    _ => io::ErrorKind::Other,
                };
                io::Error::new(kind, other)
            }
        }
    }
}

/// Convenience type alias for filesystem operations.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_predicate() {
        assert!(VfsError::not_found("a").is_not_found());
        assert!(VfsError::Io(io::Error::from(io::ErrorKind::NotFound)).is_not_found());
        assert!(!VfsError::NotADirectory { path: "a".into() }.is_not_found());
        assert!(!VfsError::Store(StoreError::LockPoisoned).is_not_found());
    }

    #[test]
    fn io_error_kinds() {
        let e: io::Error = VfsError::not_found("a").into();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);

        let e: io::Error = VfsError::AlreadyExists { path: "a".into() }.into();
        assert_eq!(e.kind(), io::ErrorKind::AlreadyExists);

        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let e: io::Error = VfsError::Store(StoreError::Io(inner)).into();
        assert_eq!(e.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn display_includes_path() {
        let e = VfsError::DirectoryNotEmpty { path: "x/y".into() };
        assert_eq!(e.to_string(), "directory not empty: x/y");
    }
}
