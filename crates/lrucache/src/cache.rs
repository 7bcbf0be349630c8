//! Cache: LRU eviction policy and eviction callback over the recency list

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::builder::CacheBuilder;
use crate::lru::{Iter, LruList};

/// Callback invoked with the key and value of an entry leaving the cache
pub type OnEvicted<K, V> = Box<dyn FnMut(K, V) + Send>;

/// Fixed-capacity LRU cache.
///
/// Not safe for concurrent access: every operation takes `&mut self` or
/// `&self` and callers sharing a cache across threads must serialize access
/// themselves, e.g. with a mutex around the whole cache.
///
/// Keys must have consistent `Hash` and `Eq` implementations. A key type
/// whose hash changes while it is stored leaves that entry unreachable
/// through lookups; the cache does not detect this.
pub struct Cache<K, V> {
    /// Recency-ordered entries and their key index
    entries: LruList<K, V>,

    /// Entry limit, 0 for unlimited
    max_entries: usize,

    /// Runs whenever an entry leaves the cache
    on_evicted: Option<OnEvicted<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new cache.
    ///
    /// If `max_entries` is zero the cache has no limit and eviction is left
    /// to the caller.
    pub fn new(max_entries: usize) -> Self {
        CacheBuilder::new().max_entries(max_entries).build()
    }

    /// Start configuring a cache
    pub fn builder() -> CacheBuilder<K, V> {
        CacheBuilder::new()
    }

    pub(crate) fn from_parts(
        entries: LruList<K, V>,
        max_entries: usize,
        on_evicted: Option<OnEvicted<K, V>>,
    ) -> Self {
        Self {
            entries,
            max_entries,
            on_evicted,
        }
    }

    /// Add a value to the cache.
    ///
    /// An existing key has its value replaced and becomes most-recently-used
    /// without running the eviction callback. A new key that pushes the cache
    /// over its limit evicts the least-recently-used entry.
    pub fn add(&mut self, key: K, value: V) {
        if let Some(idx) = self.entries.lookup(&key) {
            *self.entries.value_mut(idx) = value;
            self.entries.touch(idx);
            return;
        }
        self.insert(key, value);
    }

    /// Look up a key's value, marking it most-recently-used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.entries.lookup(key)?;
        self.entries.touch(idx);
        Some(self.entries.value(idx))
    }

    /// Mutable lookup, marking the entry most-recently-used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.entries.lookup(key)?;
        self.entries.touch(idx);
        Some(self.entries.value_mut(idx))
    }

    /// Look up a key's value without changing its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lookup(key).map(|idx| self.entries.value(idx))
    }

    /// Whether `key` is cached. Does not change recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lookup(key).is_some()
    }

    /// The entry [`remove_oldest`](Self::remove_oldest) would evict
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.entries.back().map(|idx| self.entries.entry(idx))
    }

    /// Return the cached value for `key`, computing and adding it on a miss.
    ///
    /// A miss goes through the same path as [`add`](Self::add) and may evict
    /// the least-recently-used entry.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let idx = match self.entries.lookup(&key) {
            Some(idx) => {
                self.entries.touch(idx);
                idx
            }
            None => self.insert(key, f()),
        };
        self.entries.value(idx)
    }

    /// Fallible [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// If `f` fails its error is returned and the cache is left untouched.
    pub fn try_get_or_insert_with<F, E>(&mut self, key: K, f: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let idx = match self.entries.lookup(&key) {
            Some(idx) => {
                self.entries.touch(idx);
                idx
            }
            None => {
                let value = f()?;
                self.insert(key, value)
            }
        };
        Ok(self.entries.value(idx))
    }

    /// Remove `key` from the cache, running the eviction callback.
    ///
    /// Returns whether an entry was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self
            .entries
            .lookup(key)
            .and_then(|idx| self.entries.detach(idx));
        self.notify_evicted(removed)
    }

    /// Remove the least-recently-used entry, running the eviction callback.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_oldest(&mut self) -> bool {
        let removed = self.entries.pop_back();
        self.notify_evicted(removed)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Entry limit, 0 for unlimited
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Change the entry limit.
    ///
    /// Lowering it evicts least-recently-used entries until the cache fits.
    /// Zero removes the limit.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        if max_entries == 0 {
            return;
        }

        let excess = self.len().saturating_sub(max_entries);
        if excess > 0 {
            debug!(excess, max_entries, "shrinking cache");
            for _ in 0..excess {
                self.remove_oldest();
            }
        }
    }

    /// Replace the eviction callback
    pub fn set_on_evicted<F>(&mut self, f: F)
    where
        F: FnMut(K, V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(f));
    }

    /// Drop the eviction callback
    pub fn clear_on_evicted(&mut self) {
        self.on_evicted = None;
    }

    /// Purge every entry.
    ///
    /// The eviction callback runs once per entry, in no particular order.
    /// The limit and callback stay configured.
    pub fn clear(&mut self) {
        let cleared = self.len();

        match self.on_evicted.as_mut() {
            Some(on_evicted) => {
                for (key, value) in self.entries.drain() {
                    on_evicted(key, value);
                }
            }
            None => self.entries.drain().for_each(drop),
        }

        debug!(cleared, "cache cleared");
    }

    /// Iterate entries from most- to least-recently-used without changing
    /// recency
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Insert a key known to be absent, then enforce the limit
    fn insert(&mut self, key: K, value: V) -> usize {
        let idx = self.entries.push_front(key, value);
        if self.max_entries != 0 && self.entries.len() > self.max_entries {
            trace!(
                len = self.entries.len(),
                max_entries = self.max_entries,
                "evicting least recently used entry"
            );
            self.remove_oldest();
        }
        idx
    }

    /// Hand an entry that already left both structures to the callback
    fn notify_evicted(&mut self, removed: Option<(K, V)>) -> bool {
        let Some((key, value)) = removed else {
            return false;
        };
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(key, value);
        }
        true
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new(0)
    }
}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("len", &self.len())
            .field("max_entries", &self.max_entries)
            .field("on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
