//! Flat key/value blob storage for keyfs.
//!
//! A blob store addresses each object by one opaque string key and offers
//! only whole-object put/get/delete plus listing by prefix. It has no notion
//! of directories; `keyfs-vfs` emulates those on top.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`LocalBlobStore`] -- one file per object in a local directory
//! - [`ConfiguredStore`] -- either of the above, chosen by [`StoreConfig`]
//!
//! # Design Rules
//!
//! 1. A put replaces the whole object; there are no partial writes.
//! 2. Delete is idempotent.
//! 3. Listings are sorted and may be bounded by a limit.
//! 4. The store never interprets object contents or key structure beyond
//!    the prefix/delimiter grouping of a listing.
//! 5. All I/O errors are propagated, never retried here.

pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{ConfiguredStore, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use local::LocalBlobStore;
pub use memory::InMemoryBlobStore;
pub use object::{ListRequest, Listing, Object, ObjectMeta};
pub use traits::BlobStore;
