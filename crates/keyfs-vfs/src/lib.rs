//! A hierarchical read-write filesystem over a flat blob store.
//!
//! Blob stores address objects by opaque keys and know nothing about
//! directories. This crate maps slash-separated paths onto keys and derives
//! the hierarchy from prefix listings.
//!
//! # Directory Emulation
//!
//! - A path is a **file** if an object is stored at its key.
//! - A path is a **directory** if any key lies below `key + "/"`. This
//!   includes the zero-length marker at exactly `key + "/"` that
//!   [`FileSystem::mkdir`] and [`mkdir_all`] write.
//! - If both hold, the path is a directory. The object stays readable through
//!   [`FileSystem::open`].
//! - The root always exists and can never be removed.
//!
//! Nothing about directories is cached; every call asks the store again. On
//! an eventually consistent store a removed path may keep showing up for a
//! while.
//!
//! # Modules
//!
//! - [`path`] -- path cleaning and the path ↔ key mapping
//! - [`dirs`] -- stat and directory listing, including the file/directory rule
//! - [`handle`] -- buffered write handles and read handles
//! - [`traits`] -- the [`FileSystem`] trait
//! - [`fs`] -- [`ObjectFs`], the store-backed implementation
//! - [`mkdir`] -- [`mkdir_all`]
//! - [`glob`](mod@glob) -- [`glob()`], segment-wise pattern matching
//!
//! # Example
//!
//! ```
//! use keyfs_store::InMemoryBlobStore;
//! use keyfs_vfs::{glob, mkdir_all, FileSystem, ObjectFs};
//!
//! let fs = ObjectFs::new(InMemoryBlobStore::new());
//! mkdir_all(&fs, "x/y").unwrap();
//! fs.write_file("x/y/0.txt", b"hello").unwrap();
//! fs.write_file("x/2.txt", b"world").unwrap();
//!
//! assert!(fs.stat("x/y").unwrap().is_dir());
//! assert_eq!(fs.read_file("x/y/0.txt").unwrap(), b"hello");
//! assert_eq!(glob(&fs, "", "x/*").unwrap(), ["x/2.txt", "x/y"]);
//! ```

pub mod dirs;
pub mod error;
pub mod fs;
pub mod glob;
pub mod handle;
pub mod info;
pub mod mkdir;
pub mod path;
pub mod traits;

#[cfg(test)]
mod testing;

pub use error::{VfsError, VfsResult};
pub use fs::ObjectFs;
pub use self::glob::glob;
pub use handle::{FileWriter, ReadHandle, WriteHandle};
pub use info::{FileInfo, FileKind};
pub use mkdir::mkdir_all;
pub use traits::FileSystem;
