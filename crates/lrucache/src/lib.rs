//! # lrucache
//!
//! Fixed-capacity, in-memory LRU cache.
//!
//! ## Architecture
//! - **Recency list**: slot arena linked by index, most-recently-used first (O(1) reorder and eviction)
//! - **Key index**: AHash map from key to slot (O(1) lookup)
//! - **Eviction callback**: runs synchronously whenever an entry leaves the cache
//!
//! The cache is single-threaded. Wrap it in a mutex to share it.
//!
//! ```
//! use lrucache::Cache;
//!
//! let mut cache = Cache::new(2);
//! cache.add("a", 1);
//! cache.add("b", 2);
//! cache.get("a");
//! cache.add("c", 3);
//!
//! assert_eq!(cache.get("b"), None);
//! assert_eq!(cache.get("a"), Some(&1));
//! ```

#![warn(missing_docs)]

mod builder;
mod cache;
mod lru;

pub use builder::CacheBuilder;
pub use cache::{Cache, OnEvicted};
pub use lru::Iter;
