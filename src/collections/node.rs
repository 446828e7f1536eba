//! Tree node for slab-based storage.
//!
//! ## Design
//!
//! `IndexNode` wraps one key/value pair of a [`KeyedIndex`](super::KeyedIndex)
//! with child links and a cached subtree height. Links are slab keys
//! (`usize`), not references, so rotations only rewrite integers and the
//! tree never needs `Box` or `Rc`.
//!
//! ## Invariants
//!
//! - every key in `left` is strictly less than `key`
//! - every key in `right` is strictly greater than `key`
//! - `height == 1 + max(height(left), height(right))`, leaves have height 1

/// Node stored in the tree's slab.
///
/// ## Memory Layout
///
/// ```text
/// IndexNode {
///     key, value,
///     left:  Option<usize>   (slab key)
///     right: Option<usize>   (slab key)
///     height: u32
/// }
/// ```
#[derive(Debug, Clone)]
pub struct IndexNode<K, V> {
    /// Ordering key
    pub key: K,

    /// Stored value
    pub value: V,

    /// Left child (smaller keys)
    pub left: Option<usize>,

    /// Right child (larger keys)
    pub right: Option<usize>,

    /// Height of the subtree rooted here (leaf = 1)
    pub height: u32,
}

impl<K, V> IndexNode<K, V> {
    /// Create a detached leaf
    ///
    /// # Example
    ///
    /// ```
    /// use vault_index::collections::IndexNode;
    ///
    /// let node = IndexNode::new("ab12cd34", 7usize);
    /// assert_eq!(node.child_count(), 0);
    /// assert_eq!(node.height, 1);
    /// ```
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Number of children (0, 1 or 2)
    #[inline]
    pub fn child_count(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
