//! Cache construction and configuration

use std::hash::Hash;

use crate::cache::{Cache, OnEvicted};
use crate::lru::LruList;

/// Upper bound on the default up-front allocation for bounded caches
const DEFAULT_PREALLOCATE_LIMIT: usize = 1024;

/// Builder for [`Cache`]
///
/// ```
/// use lrucache::Cache;
///
/// let mut cache = Cache::<&str, u32>::builder()
///     .max_entries(2)
///     .on_evicted(|key, value| println!("dropped {key}={value}"))
///     .build();
///
/// cache.add("a", 1);
/// cache.add("b", 2);
/// cache.add("c", 3); // prints "dropped a=1"
/// assert_eq!(cache.len(), 2);
/// ```
pub struct CacheBuilder<K, V> {
    max_entries: usize,
    preallocate: Option<usize>,
    on_evicted: Option<OnEvicted<K, V>>,
}

impl<K, V> CacheBuilder<K, V> {
    /// Create a builder for an unlimited cache with no eviction callback
    pub fn new() -> Self {
        Self {
            max_entries: 0,
            preallocate: None,
            on_evicted: None,
        }
    }

    /// Maximum number of entries before the least-recently-used one is
    /// evicted. Zero means no limit.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Reserve room for `entries` entries up front.
    ///
    /// Defaults to `max_entries` capped at 1024, or nothing for an
    /// unlimited cache.
    pub fn preallocate(mut self, entries: usize) -> Self {
        self.preallocate = Some(entries);
        self
    }

    /// Callback run with the key and value of every entry that leaves the
    /// cache, whether by eviction, removal, or clear.
    pub fn on_evicted<F>(mut self, f: F) -> Self
    where
        F: FnMut(K, V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(f));
        self
    }

    /// Build the cache
    pub fn build(self) -> Cache<K, V>
    where
        K: Hash + Eq + Clone,
    {
        let preallocate = self
            .preallocate
            .unwrap_or_else(|| self.max_entries.min(DEFAULT_PREALLOCATE_LIMIT));

        Cache::from_parts(
            LruList::with_capacity(preallocate),
            self.max_entries,
            self.on_evicted,
        )
    }
}

impl<K, V> Default for CacheBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_builder_defaults() {
        let cache: Cache<u32, u32> = CacheBuilder::new().build();

        assert_eq!(cache.max_entries(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_builder_max_entries() {
        let mut cache = CacheBuilder::new().max_entries(3).build();

        for i in 0..10u32 {
            cache.add(i, i);
        }

        assert_eq!(cache.max_entries(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_builder_preallocate_does_not_limit() {
        let mut cache = CacheBuilder::new().preallocate(2).build();

        for i in 0..100u32 {
            cache.add(i, ());
        }

        assert_eq!(cache.len(), 100);
    }

    #[test]
    fn test_builder_on_evicted() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);

        let mut cache = CacheBuilder::new()
            .max_entries(1)
            .on_evicted(move |k: u32, v: &'static str| sink.lock().push((k, v)))
            .build();

        cache.add(1, "a");
        cache.add(2, "b");

        assert_eq!(*evicted.lock(), vec![(1, "a")]);
    }
}
