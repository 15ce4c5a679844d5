//! Type-safe key-value slot layer for Cakeshop.
//!
//! Provides a small, ergonomic API for keeping durable values in a key-value
//! store with automatic JSON serialization. Two stores ship with the crate:
//! [`MemoryStore`] for tests and embedding, and [`FileStore`] which keeps one
//! JSON file per key on disk.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cakeshop_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(Arc::new(MemoryStore::new()));
//!
//! cache.set("cart", &vec![1, 2, 3]).unwrap();
//! let value: Option<Vec<i32>> = cache.get("cart").unwrap();
//! assert_eq!(value, Some(vec![1, 2, 3]));
//!
//! cache.delete("cart").unwrap();
//! assert!(!cache.exists("cart").unwrap());
//! ```

mod error;
mod file;
mod kv;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use store::{KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
