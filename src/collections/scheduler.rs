//! Max-priority queue with first-in-first-out tie-breaking.
//!
//! ## Ordering
//!
//! Items are delivered by descending priority. Among equal priorities the
//! earlier push wins: every push is stamped with a monotonically increasing
//! sequence number and [`ScheduledItem`] orders on `(priority, Reverse(seq))`.
//!
//! ## Example
//!
//! ```
//! use vault_index::collections::PriorityScheduler;
//!
//! let mut queue = PriorityScheduler::new();
//! queue.push("X", 5);
//! queue.push("Y", 5);
//! queue.push("Z", 9);
//!
//! assert_eq!(queue.pop(), Ok("Z"));
//! assert_eq!(queue.pop(), Ok("X"));
//! assert_eq!(queue.pop(), Ok("Y"));
//! assert!(queue.pop().is_err());
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{CollectionError, CollectionResult};

/// Queue entry: payload plus its ordering stamp
#[derive(Debug, Clone)]
pub struct ScheduledItem<T, P> {
    pub priority: P,
    /// Insertion sequence; lower is older
    pub sequence: u64,
    pub payload: T,
}

impl<T, P: Ord> PartialEq for ScheduledItem<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, P: Ord> Eq for ScheduledItem<T, P> {}

impl<T, P: Ord> PartialOrd for ScheduledItem<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, P: Ord> Ord for ScheduledItem<T, P> {
    /// Greater = delivered first: higher priority, then lower sequence
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Stable max-priority queue
#[derive(Debug, Clone)]
pub struct PriorityScheduler<T, P = u64> {
    heap: BinaryHeap<ScheduledItem<T, P>>,
    next_sequence: u64,
}

impl<T, P: Ord> Default for PriorityScheduler<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> PriorityScheduler<T, P> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Enqueue `payload` at `priority`. O(log n)
    pub fn push(&mut self, payload: T, priority: P) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledItem {
            priority,
            sequence,
            payload,
        });
    }

    /// Remove and return the next item. O(log n)
    pub fn pop(&mut self) -> CollectionResult<T> {
        self.heap
            .pop()
            .map(|item| item.payload)
            .ok_or(CollectionError::EmptyQueue)
    }

    /// Next item without removing it
    pub fn peek(&self) -> CollectionResult<&T> {
        self.heap
            .peek()
            .map(|item| &item.payload)
            .ok_or(CollectionError::EmptyQueue)
    }

    /// Priority of the next item
    pub fn peek_priority(&self) -> CollectionResult<&P> {
        self.heap
            .peek()
            .map(|item| &item.priority)
            .ok_or(CollectionError::EmptyQueue)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every item and restart the sequence
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }

    /// Pop everything, in delivery order
    pub fn drain_ordered(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.heap.pop() {
            out.push(item.payload);
        }
        out
    }

    /// Payloads in delivery order, without consuming the queue
    pub fn iter_ordered(&self) -> impl Iterator<Item = &T> {
        let mut items: Vec<&ScheduledItem<T, P>> = self.heap.iter().collect();
        items.sort_unstable_by(|a, b| b.cmp(a));
        items.into_iter().map(|item| &item.payload)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
