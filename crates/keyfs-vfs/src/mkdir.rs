use tracing::debug;

use crate::error::{VfsError, VfsResult};
use crate::path;
use crate::traits::FileSystem;

/// Create `path` and every missing ancestor, top down.
///
/// Idempotent: ancestors that already stat as directories are left alone, so
/// a call that failed partway can simply be retried. Fails with
/// [`VfsError::NotADirectory`] if an ancestor is a regular file.
pub fn mkdir_all<F: FileSystem + ?Sized>(fs: &F, path: &str) -> VfsResult<()> {
    for dir in path::ancestors(path) {
        match fs.stat(&dir) {
            Ok(info) if info.is_dir() => continue,
            Ok(_) => return Err(VfsError::NotADirectory { path: dir }),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        match fs.mkdir(&dir) {
            Ok(()) => debug!(path = %dir, "created missing ancestor"),
            // Someone else got there first.
            Err(VfsError::AlreadyExists { .. }) if fs.stat(&dir)?.is_dir() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfs_store::{BlobStore, InMemoryBlobStore, ListRequest};

    use crate::fs::ObjectFs;

    fn memory_fs() -> ObjectFs<InMemoryBlobStore> {
        ObjectFs::new(InMemoryBlobStore::new())
    }

    fn all_keys(fs: &ObjectFs<InMemoryBlobStore>) -> Vec<String> {
        fs.store()
            .list(&ListRequest::new(""))
            .unwrap()
            .objects
            .into_iter()
            .map(|meta| meta.key)
            .collect()
    }

    #[test]
    fn creates_every_ancestor() {
        let fs = memory_fs();
        mkdir_all(&fs, "/a/b/c").unwrap();
        for dir in ["a", "a/b", "a/b/c"] {
            assert!(fs.stat(dir).unwrap().is_dir(), "{dir} should be a dir");
        }
    }

    #[test]
    fn twice_equals_once() {
        let once = memory_fs();
        mkdir_all(&once, "a/b/c").unwrap();

        let twice = memory_fs();
        mkdir_all(&twice, "a/b/c").unwrap();
        mkdir_all(&twice, "a/b/c").unwrap();

        assert_eq!(all_keys(&once), all_keys(&twice));
    }

    #[test]
    fn skips_synthetic_directories() {
        let fs = memory_fs();
        fs.write_file("a/b/file", b"x").unwrap();
        mkdir_all(&fs, "a/b/c").unwrap();
        // "a" and "a/b" already had descendants; only "a/b/c" needed a marker.
        assert_eq!(all_keys(&fs), ["a/b/c/", "a/b/file"]);
    }

    #[test]
    fn root_is_a_no_op() {
        let fs = memory_fs();
        mkdir_all(&fs, "/").unwrap();
        assert!(fs.store().is_empty());
    }

    #[test]
    fn file_in_the_way() {
        let fs = memory_fs();
        fs.write_file("a/f", b"x").unwrap();
        let err = mkdir_all(&fs, "a/f/g").unwrap_err();
        assert!(matches!(err, VfsError::NotADirectory { ref path } if path == "a/f"));
    }

    #[test]
    fn resumes_after_partial_failure() {
        let fs = memory_fs();
        // Simulate an earlier run that only got as far as "a".
        fs.mkdir("a").unwrap();
        mkdir_all(&fs, "a/b/c").unwrap();
        assert!(fs.stat("a/b/c").unwrap().is_dir());
    }
}
