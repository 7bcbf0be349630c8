//! Recency list with a key index
//!
//! Entries live in an arena of slots linked by index, so moving an entry to
//! the front or unlinking the tail is O(1) without aliased pointers. The
//! key map and the list always hold exactly the same set of entries.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FusedIterator;

use ahash::RandomState;

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Entries ordered from most- to least-recently-used, indexed by key
pub(crate) struct LruList<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
}

impl<K, V> LruList<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty list with room for `capacity` entries
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    /// Slot holding `key`, if present
    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Least-recently-used slot
    pub(crate) fn back(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn value(&self, idx: usize) -> &V {
        match &self.nodes[idx] {
            Some(node) => &node.value,
            None => unreachable!("slot {idx} is vacant"),
        }
    }

    pub(crate) fn value_mut(&mut self, idx: usize) -> &mut V {
        match &mut self.nodes[idx] {
            Some(node) => &mut node.value,
            None => unreachable!("slot {idx} is vacant"),
        }
    }

    pub(crate) fn entry(&self, idx: usize) -> (&K, &V) {
        match &self.nodes[idx] {
            Some(node) => (&node.key, &node.value),
            None => unreachable!("slot {idx} is vacant"),
        }
    }

    /// Insert a new entry at the front and return its slot.
    ///
    /// The caller guarantees `key` is not already present.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        debug_assert!(!self.map.contains_key(&key));

        let idx = self.alloc_slot(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.map.insert(key, idx);
        idx
    }

    /// Mark an entry as most-recently-used
    pub(crate) fn touch(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.unlink(idx);
            self.link_front(idx);
        }
    }

    /// Take an entry out of both the list and the index
    pub(crate) fn detach(&mut self, idx: usize) -> Option<(K, V)> {
        self.nodes.get(idx)?.as_ref()?;

        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.map.remove(&node.key);
        self.free_list.push(idx);

        Some((node.key, node.value))
    }

    /// Take the least-recently-used entry out of the list and the index
    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.detach(idx)
    }

    /// Empty the list, yielding every entry in unspecified order.
    ///
    /// The list is already empty when this returns; dropping the iterator
    /// early drops the remaining entries.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (K, V)> + '_ {
        self.map.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.nodes
            .drain(..)
            .flatten()
            .map(|node| (node.key, node.value))
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Splice a slot out of the list, joining its neighbours
    fn unlink(&mut self, idx: usize) {
        let Some(node) = &self.nodes[idx] else {
            return;
        };
        let (prev, next) = (node.prev, node.next);

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }
    }

    /// Make a detached slot the new head
    fn link_front(&mut self, idx: usize) {
        let old_head = self.head.replace(idx);
        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => self.set_prev(h, Some(idx)),
            None => self.tail = Some(idx),
        }
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(node) = &mut self.nodes[idx] {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(node) = &mut self.nodes[idx] {
            node.next = next;
        }
    }

    /// Store `node` in a free slot, growing the arena if none is left
    fn alloc_slot(&mut self, node: Node<K, V>) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }
}

/// Iterator over cache entries from most- to least-recently-used.
///
/// Created by [`Cache::iter`](crate::Cache::iter). Iterating does not
/// change recency.
pub struct Iter<'a, K, V> {
    nodes: &'a [Option<Node<K, V>>],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = nodes[self.cursor?].as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
