//! Chained hash table for O(1) average identifier lookup.
//!
//! ## Layout
//!
//! ```text
//! buckets: Vec<CacheSlot>
//!   [0] -> [(k, v), (k, v)]
//!   [1] -> []
//!   [2] -> [(k, v)]
//!   ...
//! ```
//!
//! The bucket for a key is `hasher.hash_one(key) % buckets.len()`. The
//! hasher is fixed per instance, so a rehash moves every entry with the same
//! function. A rehash doubles the bucket count whenever an insert would push
//! `len / buckets` above the configured maximum load factor.
//!
//! ## Complexity
//!
//! | Operation | Average | Worst |
//! |-----------|---------|-------|
//! | insert | O(1) | O(n) |
//! | get | O(1) | O(n) |
//! | remove | O(1) | O(n) |

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use crate::error::{CollectionError, CollectionResult};

/// Default bucket count for [`FastLookupCache::new`]
pub const DEFAULT_BUCKETS: usize = 100;

/// Default maximum load factor before the table doubles
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// One bucket: the chain of entries whose hash lands here
#[derive(Debug, Clone)]
pub struct CacheSlot<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for CacheSlot<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K, V> CacheSlot<K, V> {
    /// Chain length
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().position(|(k, _)| k.borrow() == key)
    }
}

/// Chained hash table keyed by entity identifier
#[derive(Debug, Clone)]
pub struct FastLookupCache<K, V, S = RandomState> {
    buckets: Vec<CacheSlot<K, V>>,
    len: usize,
    max_load_factor: f64,
    hasher: S,
}

impl<K: Hash + Eq, V> Default for FastLookupCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> FastLookupCache<K, V> {
    /// 100 buckets, load factor 0.75
    pub fn new() -> Self {
        Self::with_config(DEFAULT_BUCKETS, DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Custom bucket count, default load factor
    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_config(buckets, DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Custom bucket count and load factor
    ///
    /// A zero bucket count is raised to one; a non-positive or non-finite
    /// load factor falls back to the default.
    pub fn with_config(buckets: usize, max_load_factor: f64) -> Self {
        Self::with_hasher(buckets, max_load_factor, RandomState::new())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> FastLookupCache<K, V, S> {
    /// Fully configured table with a caller-supplied hasher
    pub fn with_hasher(buckets: usize, max_load_factor: f64, hasher: S) -> Self {
        let max_load_factor = if max_load_factor.is_finite() && max_load_factor > 0.0 {
            max_load_factor
        } else {
            DEFAULT_MAX_LOAD_FACTOR
        };

        Self {
            buckets: Self::empty_buckets(buckets.max(1)),
            len: 0,
            max_load_factor,
            hasher,
        }
    }

    // ========================================================================
    // Core operations
    // ========================================================================

    /// Insert or overwrite `key`
    ///
    /// Returns the previous value when the key was already present.
    ///
    /// # Example
    ///
    /// ```
    /// use vault_index::collections::FastLookupCache;
    ///
    /// let mut cache = FastLookupCache::with_buckets(4);
    /// assert_eq!(cache.insert("ab12cd34", 1), None);
    /// assert_eq!(cache.insert("ab12cd34", 2), Some(1));
    /// assert_eq!(cache.get("ab12cd34"), Ok(&2));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let slot = self.slot_of(&key);
        if let Some(pos) = self.buckets[slot].position(&key) {
            let entry = &mut self.buckets[slot].entries[pos];
            return Some(std::mem::replace(&mut entry.1, value));
        }

        if (self.len + 1) as f64 / self.buckets.len() as f64 > self.max_load_factor {
            self.rehash(self.buckets.len() * 2);
        }

        let slot = self.slot_of(&key);
        self.buckets[slot].entries.push((key, value));
        self.len += 1;
        None
    }

    /// Look up `key`
    pub fn get<Q>(&self, key: &Q) -> CollectionResult<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = &self.buckets[self.slot_of(key)];
        bucket
            .position(key)
            .map(|pos| &bucket.entries[pos].1)
            .ok_or(CollectionError::KeyNotFound)
    }

    /// Look up `key` for in-place mutation
    pub fn get_mut<Q>(&mut self, key: &Q) -> CollectionResult<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(key);
        let bucket = &mut self.buckets[slot];
        let pos = bucket.position(key).ok_or(CollectionError::KeyNotFound)?;
        Ok(&mut bucket.entries[pos].1)
    }

    /// Remove `key`, returning its value
    pub fn remove<Q>(&mut self, key: &Q) -> CollectionResult<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(key);
        let bucket = &mut self.buckets[slot];
        let pos = bucket.position(key).ok_or(CollectionError::KeyNotFound)?;
        let (_, value) = bucket.entries.remove(pos);
        self.len -= 1;
        Ok(value)
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_ok()
    }

    /// Drop every entry, keeping the current bucket count
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.entries.clear();
        }
        self.len = 0;
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Current `len / bucket_count`
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    #[inline]
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Length of the longest chain
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(CacheSlot::len).max().unwrap_or(0)
    }

    /// Iterate entries in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.entries.iter().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    // ========================================================================
    // Internal
    // ========================================================================

    #[inline]
    fn slot_of<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    fn rehash(&mut self, new_count: usize) {
        let old = std::mem::replace(&mut self.buckets, Self::empty_buckets(new_count));
        for bucket in old {
            for (key, value) in bucket.entries {
                let slot = self.slot_of(&key);
                self.buckets[slot].entries.push((key, value));
            }
        }
    }

    fn empty_buckets(count: usize) -> Vec<CacheSlot<K, V>> {
        (0..count).map(|_| CacheSlot::default()).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
