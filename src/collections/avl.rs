//! Self-balancing binary search tree (AVL) keyed by ordered identifiers.
//!
//! ## Architecture
//!
//! Nodes live in a [`Slab`] and link to each other by slab key, the same
//! arena layout the rest of the crate uses for entities. All operations are
//! iterative: insertion and removal record the descent in an explicit path
//! stack and rebalance while unwinding it, and traversal keeps its own
//! stack. Depth is therefore bounded by the heap, not the call stack.
//!
//! ## Rebalancing
//!
//! After an insert, each ancestor on the path has its height recomputed. If
//! its balance factor leaves {-1, 0, 1}, the rotation case is chosen by
//! comparing the *inserted key* with the heavy child's key:
//!
//! | Balance | Inserted key vs child | Case | Rotations |
//! |---------|-----------------------|------|-----------|
//! | > 1  | < left.key  | left-left   | right(node) |
//! | > 1  | > left.key  | left-right  | left(child), right(node) |
//! | < -1 | > right.key | right-right | left(node) |
//! | < -1 | < right.key | right-left  | right(child), left(node) |
//!
//! Removal has no inserted key to compare, so it uses the heavy child's
//! balance factor instead.
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | insert | O(log n) |
//! | find | O(log n) |
//! | remove | O(log n) |
//! | in-order traversal | O(n) |
//!
//! ## Example
//!
//! ```
//! use vault_index::collections::KeyedIndex;
//!
//! let mut index = KeyedIndex::new();
//! for (i, key) in ["m", "c", "x", "a", "e"].iter().enumerate() {
//!     index.insert(key.to_string(), i);
//! }
//!
//! assert_eq!(index.find("e"), Some(&4));
//! assert_eq!(index.keys(), vec!["a", "c", "e", "m", "x"]);
//! assert!(index.validate());
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;

use slab::Slab;

use crate::collections::IndexNode;
use crate::error::{CollectionError, CollectionResult};

/// AVL tree mapping ordered keys to values.
#[derive(Debug, Clone)]
pub struct KeyedIndex<K, V> {
    /// Node storage; links are slab keys
    nodes: Slab<IndexNode<K, V>>,

    /// Slab key of the root, None when empty
    root: Option<usize>,
}

impl<K: Ord, V> Default for KeyedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> KeyedIndex<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            root: None,
        }
    }

    /// Create an empty tree with pre-allocated node storage
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of keys
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (0 when empty)
    #[inline]
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Find the value stored under `key`
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).map(|idx| &self.nodes[idx].value)
    }

    /// Find the value stored under `key` for in-place mutation
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let idx = self.locate(key)?;
        Some(&mut self.nodes[idx].value)
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Smallest key and its value
    pub fn min(&self) -> CollectionResult<(&K, &V)> {
        let mut idx = self.root.ok_or(CollectionError::EmptyStructure)?;
        while let Some(left) = self.nodes[idx].left {
            idx = left;
        }
        let node = &self.nodes[idx];
        Ok((&node.key, &node.value))
    }

    /// Largest key and its value
    pub fn max(&self) -> CollectionResult<(&K, &V)> {
        let mut idx = self.root.ok_or(CollectionError::EmptyStructure)?;
        while let Some(right) = self.nodes[idx].right {
            idx = right;
        }
        let node = &self.nodes[idx];
        Ok((&node.key, &node.value))
    }

    fn locate<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(idx),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert `value` under `key`
    ///
    /// An existing key has its value overwritten in place (the tree shape
    /// does not change) and the previous value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut path: Vec<usize> = Vec::with_capacity(self.height() as usize + 1);
        let mut cursor = self.root;

        while let Some(idx) = cursor {
            let node = &mut self.nodes[idx];
            cursor = match key.cmp(&node.key) {
                Ordering::Equal => return Some(std::mem::replace(&mut node.value, value)),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            path.push(idx);
        }

        let inserted = self.nodes.insert(IndexNode::new(key, value));
        let Some(&parent) = path.last() else {
            self.root = Some(inserted);
            return None;
        };

        if self.nodes[inserted].key < self.nodes[parent].key {
            self.nodes[parent].left = Some(inserted);
        } else {
            self.nodes[parent].right = Some(inserted);
        }

        while let Some(idx) = path.pop() {
            let subtree = self.rebalance_after_insert(idx, inserted);
            self.replace_child(path.last().copied(), idx, subtree);
        }

        None
    }

    /// Restore balance at `idx` after `inserted` was added below it.
    ///
    /// Returns the slab key of the subtree's new root.
    fn rebalance_after_insert(&mut self, idx: usize, inserted: usize) -> usize {
        self.update_height(idx);
        let balance = self.balance_factor(idx);

        if balance > 1 {
            let Some(left) = self.nodes[idx].left else {
                return idx;
            };
            if self.nodes[inserted].key > self.nodes[left].key {
                let new_left = self.rotate_left(left);
                self.nodes[idx].left = Some(new_left);
            }
            return self.rotate_right(idx);
        }

        if balance < -1 {
            let Some(right) = self.nodes[idx].right else {
                return idx;
            };
            if self.nodes[inserted].key < self.nodes[right].key {
                let new_right = self.rotate_right(right);
                self.nodes[idx].right = Some(new_right);
            }
            return self.rotate_left(idx);
        }

        idx
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Remove `key`, returning its value
    ///
    /// Every ancestor of the physically removed node is rebalanced.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path: Vec<usize> = Vec::with_capacity(self.height() as usize + 1);
        let mut cursor = self.root;
        let target = loop {
            let idx = cursor?;
            let node = &self.nodes[idx];
            cursor = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break idx,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            path.push(idx);
        };

        // Two children: swap the in-order successor's entry into `target`
        // and physically remove the successor instead.
        let doomed = match self.nodes[target].right {
            Some(right) if self.nodes[target].child_count() == 2 => {
                path.push(target);
                let mut successor = right;
                while let Some(left) = self.nodes[successor].left {
                    path.push(successor);
                    successor = left;
                }
                if let Some((a, b)) = self.nodes.get2_mut(target, successor) {
                    std::mem::swap(&mut a.key, &mut b.key);
                    std::mem::swap(&mut a.value, &mut b.value);
                }
                successor
            }
            _ => target,
        };

        let child = self.nodes[doomed].left.or(self.nodes[doomed].right);
        match path.last().copied() {
            Some(parent) => {
                if self.nodes[parent].left == Some(doomed) {
                    self.nodes[parent].left = child;
                } else {
                    self.nodes[parent].right = child;
                }
            }
            None => self.root = child,
        }
        let removed = self.nodes.remove(doomed);

        while let Some(idx) = path.pop() {
            let subtree = self.rebalance(idx);
            self.replace_child(path.last().copied(), idx, subtree);
        }

        Some(removed.value)
    }

    /// General rebalance driven by the heavy child's balance factor.
    fn rebalance(&mut self, idx: usize) -> usize {
        self.update_height(idx);
        let balance = self.balance_factor(idx);

        if balance > 1 {
            if let Some(left) = self.nodes[idx].left {
                if self.balance_factor(left) < 0 {
                    let new_left = self.rotate_left(left);
                    self.nodes[idx].left = Some(new_left);
                }
            }
            return self.rotate_right(idx);
        }

        if balance < -1 {
            if let Some(right) = self.nodes[idx].right {
                if self.balance_factor(right) > 0 {
                    let new_right = self.rotate_right(right);
                    self.nodes[idx].right = Some(new_right);
                }
            }
            return self.rotate_left(idx);
        }

        idx
    }

    // ========================================================================
    // Rotations and bookkeeping
    // ========================================================================

    ///
    /// ```text
    ///       y            x
    ///      / \          / \
    ///     x   C  ==>   A   y
    ///    / \              / \
    ///   A   B            B   C
    /// ```
    fn rotate_right(&mut self, y: usize) -> usize {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        let b = self.nodes[x].right;

        self.nodes[x].right = Some(y);
        self.nodes[y].left = b;

        self.update_height(y);
        self.update_height(x);
        x
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        let b = self.nodes[y].left;

        self.nodes[y].left = Some(x);
        self.nodes[x].right = b;

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Point `parent`'s link that used to reference `old` at `new`.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: usize) {
        match parent {
            None => self.root = Some(new),
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = Some(new);
                } else if node.right == Some(old) {
                    node.right = Some(new);
                }
            }
        }
    }

    #[inline]
    fn height_of(&self, idx: Option<usize>) -> u32 {
        idx.map_or(0, |i| self.nodes[i].height)
    }

    #[inline]
    fn update_height(&mut self, idx: usize) {
        let node = &self.nodes[idx];
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.nodes[idx].height = height;
    }

    #[inline]
    fn balance_factor(&self, idx: usize) -> i64 {
        let node = &self.nodes[idx];
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// In-order iterator (ascending keys)
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::with_capacity(self.height() as usize),
            upper: None,
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// In-order iterator over keys in `[lower, upper]`
    pub fn iter_range<'a>(&'a self, lower: &K, upper: &'a K) -> Iter<'a, K, V> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::with_capacity(self.height() as usize),
            upper: Some(upper),
        };

        // Seed the stack with every ancestor whose key is >= lower.
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            if node.key < *lower {
                cursor = node.right;
            } else {
                iter.stack.push(idx);
                cursor = node.left;
            }
        }
        iter
    }

    /// Ascending `(key, value)` pairs
    pub fn in_order(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Values in ascending key order
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Check the structural invariants
    ///
    /// - in-order keys strictly ascending
    /// - every cached height equals `1 + max(child heights)`
    /// - every balance factor in {-1, 0, 1}
    /// - every stored node is reachable from the root
    pub fn validate(&self) -> bool {
        let mut reachable = 0usize;
        let mut previous: Option<&K> = None;
        for (key, _) in self.iter() {
            if previous.is_some_and(|p| p >= key) {
                return false;
            }
            previous = Some(key);
            reachable += 1;
        }
        if reachable != self.nodes.len() {
            return false;
        }

        self.nodes.iter().all(|(idx, node)| {
            let expected = 1 + self.height_of(node.left).max(self.height_of(node.right));
            node.height == expected && (-1..=1).contains(&self.balance_factor(idx))
        })
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// In-order iterator over a [`KeyedIndex`], driven by an explicit stack
pub struct Iter<'a, K, V> {
    tree: &'a KeyedIndex<K, V>,
    stack: Vec<usize>,
    upper: Option<&'a K>,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left_spine(&mut self, mut cursor: Option<usize>) {
        while let Some(idx) = cursor {
            self.stack.push(idx);
            cursor = self.tree.nodes[idx].left;
        }
    }
}

impl<'a, K: Ord, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[idx];

        if self.upper.is_some_and(|upper| node.key > *upper) {
            self.stack.clear();
            return None;
        }

        self.push_left_spine(node.right);
        Some((&node.key, &node.value))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
