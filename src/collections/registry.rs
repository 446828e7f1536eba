//! Entity registry: one arena, two indexes.
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────────────────┐
//!  key ──►   │ FastLookupCache<K, usize>│ ──┐
//!            └──────────────────────────┘   │   ┌──────────────┐
//!                                           ├─► │  Slab<T>     │
//!            ┌──────────────────────────┐   │   │  (entities)  │
//!  key ──►   │ KeyedIndex<K, usize>     │ ──┘   └──────────────┘
//!            └──────────────────────────┘
//! ```
//!
//! Each entity is stored exactly once, in the slab. Both indexes map the
//! identifier to the slab key, so a mutation made through one lookup path
//! is seen by the other. Every write goes through a single `&mut self`
//! method that updates all three structures before returning.

use std::borrow::Borrow;
use std::hash::Hash;

use slab::Slab;
use tracing::{debug, warn};

use crate::collections::{FastLookupCache, KeyedIndex};
use crate::collections::hash_table::{DEFAULT_BUCKETS, DEFAULT_MAX_LOAD_FACTOR};

/// Arena-backed entity store with ordered and hashed indexes
#[derive(Debug, Clone)]
pub struct Registry<K, T> {
    /// Entity storage
    arena: Slab<T>,

    /// Ordered index: key -> arena slot
    tree: KeyedIndex<K, usize>,

    /// Hashed index: key -> arena slot
    cache: FastLookupCache<K, usize>,
}

impl<K: Ord + Hash + Clone, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Hash + Clone, T> Registry<K, T> {
    /// Registry with the default cache geometry
    pub fn new() -> Self {
        Self::with_cache_config(DEFAULT_BUCKETS, DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Registry whose cache starts with `buckets` buckets
    pub fn with_cache_config(buckets: usize, max_load_factor: f64) -> Self {
        Self {
            arena: Slab::new(),
            tree: KeyedIndex::new(),
            cache: FastLookupCache::with_config(buckets, max_load_factor),
        }
    }

    /// Store `value` under `key`
    ///
    /// Re-inserting an existing key overwrites the entity in its current
    /// slot, so both indexes keep pointing at the latest value. Returns the
    /// replaced entity.
    pub fn insert(&mut self, key: K, value: T) -> Option<T> {
        if let Some(&slot) = self.tree.find(&key) {
            return Some(std::mem::replace(&mut self.arena[slot], value));
        }

        let slot = self.arena.insert(value);
        self.tree.insert(key.clone(), slot);
        self.cache.insert(key, slot);
        None
    }

    /// Remove `key` from the arena and both indexes
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        let slot = self.tree.remove(key)?;
        if self.cache.remove(key).is_err() {
            warn!(slot, "removed key was missing from the cache index");
        }
        self.arena.try_remove(slot)
    }

    /// Look up `key`: cache first, ordered index as fallback
    pub fn find<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(key)?;
        self.arena.get(slot)
    }

    /// Mutable lookup; the change is visible through both indexes
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(key)?;
        self.arena.get_mut(slot)
    }

    /// Look up through the hashed index only
    pub fn find_cached<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.cache.get(key).ok()?;
        self.arena.get(slot)
    }

    /// Look up through the ordered index only
    pub fn find_indexed<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = *self.tree.find(key)?;
        self.arena.get(slot)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        self.slot_of(key).is_some()
    }

    /// True when both indexes resolve `key` to the same slot (or both miss)
    pub fn indexes_agree<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        self.cache.get(key).ok() == self.tree.find(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Entities in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.tree
            .iter()
            .filter_map(|(key, &slot)| self.arena.get(slot).map(|value| (key, value)))
    }

    /// Entities in ascending key order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.iter().map(|(_, value)| value)
    }

    /// Ordered index, for diagnostics
    pub fn tree(&self) -> &KeyedIndex<K, usize> {
        &self.tree
    }

    /// Hashed index, for diagnostics
    pub fn cache(&self) -> &FastLookupCache<K, usize> {
        &self.cache
    }

    fn slot_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + Hash + Eq + ?Sized,
    {
        match self.cache.get(key) {
            Ok(&slot) => Some(slot),
            Err(_) => {
                let slot = self.tree.find(key).copied();
                if slot.is_some() {
                    debug!("cache miss resolved by ordered index");
                }
                slot
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
