//! Key-value storage engines for the directory.
//!
//! Both engines implement [`KeyValueStore`]:
//!
//! - [`NamespacedStorage`], obtained from a connected filesystem [`Storage`]. Every key
//!   is a file below `<root>/<namespace>/`, sharded by a hash of its name, written
//!   atomically (unique temp file, `fsync`, `rename`) and optionally LZ4-compressed.
//!   Paths are confined to the canonical root, so keys and symlinks cannot escape it.
//! - [`MemoryStore`], an ordered in-process map for tests and ephemeral runs.

mod builder;
mod engine;
mod error;
mod kv;
mod maintenance;
mod memory;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::{Compression, Storage};
pub use error::{StorageError, StorageErrorExt};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use namespace::{NamespaceName, NamespacedStorage};
