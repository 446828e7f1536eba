//! In-place sorting algorithms.
//!
//! Each algorithm comes in three forms, following `slice::sort_by`:
//!
//! - `*_by(slice, compare)` takes a comparator
//! - `*_by_key(slice, key)` sorts by an extracted key
//! - the bare form sorts `T: Ord` values
//!
//! All of them leave the slice in non-descending order.
//!
//! | Algorithm | Time (avg) | Time (worst) | Stable | Extra space |
//! |-----------|------------|--------------|--------|-------------|
//! | merge | O(n log n) | O(n log n) | yes | O(n) |
//! | quick (3-way) | O(n log n) | O(n²) | no | O(log n) |
//! | heap | O(n log n) | O(n log n) | no | O(1) |
//! | bubble | O(n²) | O(n²) | yes | O(1) |
//! | insertion | O(n²) | O(n²) | yes | O(1) |

use std::cmp::Ordering;

// ============================================================================
// Merge sort
// ============================================================================

/// Stable top-down merge sort with an auxiliary buffer
///
/// # Example
///
/// ```
/// use vault_index::algorithms::sort::merge_sort_by_key;
///
/// let mut rows = vec![("b", 2), ("a", 1), ("c", 2), ("d", 1)];
/// merge_sort_by_key(&mut rows, |r| r.1);
/// assert_eq!(rows, vec![("a", 1), ("d", 1), ("b", 2), ("c", 2)]);
/// ```
pub fn merge_sort_by<T, F>(slice: &mut [T], mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if slice.len() < 2 {
        return;
    }
    let mut buffer = slice.to_vec();
    split_merge(&mut buffer, slice, &mut compare);
}

pub fn merge_sort_by_key<T, K, F>(slice: &mut [T], mut key: F)
where
    T: Clone,
    K: Ord,
    F: FnMut(&T) -> K,
{
    merge_sort_by(slice, |a, b| key(a).cmp(&key(b)));
}

pub fn merge_sort<T: Ord + Clone>(slice: &mut [T]) {
    merge_sort_by(slice, T::cmp);
}

/// Sort the contents of `src` into `dst`. Both start with identical data;
/// the halves swap roles at each level.
fn split_merge<T, F>(src: &mut [T], dst: &mut [T], compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = dst.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    {
        let (src_lo, src_hi) = src.split_at_mut(mid);
        let (dst_lo, dst_hi) = dst.split_at_mut(mid);
        split_merge(dst_lo, src_lo, compare);
        split_merge(dst_hi, src_hi, compare);
    }

    let (left, right) = src.split_at(mid);
    let (mut i, mut j) = (0, 0);
    for slot in dst.iter_mut() {
        // `<=` keeps equal keys in their original order
        let take_left = j >= right.len()
            || (i < left.len() && compare(&left[i], &right[j]) != Ordering::Greater);
        if take_left {
            *slot = left[i].clone();
            i += 1;
        } else {
            *slot = right[j].clone();
            j += 1;
        }
    }
}

// ============================================================================
// Quick sort
// ============================================================================

/// Quick sort with a three-way (less / equal / greater) partition
///
/// The pivot is the middle element. Runs of equal keys are placed in one
/// pass, so heavily duplicated input does not degrade. Recursion only
/// descends into the smaller side.
pub fn quick_sort_by<T, F>(slice: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    quick_sort_range(slice, &mut compare);
}

pub fn quick_sort_by_key<T, K, F>(slice: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    quick_sort_by(slice, |a, b| key(a).cmp(&key(b)));
}

pub fn quick_sort<T: Ord>(slice: &mut [T]) {
    quick_sort_by(slice, T::cmp);
}

fn quick_sort_range<T, F>(mut slice: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while slice.len() > 1 {
        let (lt, gt) = partition3(slice, compare);
        let (lower, rest) = std::mem::take(&mut slice).split_at_mut(lt);
        let upper = &mut rest[gt - lt..];

        if lower.len() < upper.len() {
            quick_sort_range(lower, compare);
            slice = upper;
        } else {
            quick_sort_range(upper, compare);
            slice = lower;
        }
    }
}

/// Returns `(lt, gt)`: `[..lt]` less than the pivot, `[lt..gt]` equal,
/// `[gt..]` greater.
fn partition3<T, F>(slice: &mut [T], compare: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> Ordering,
{
    // Keep the pivot at index 0 while partitioning [1..], then place it.
    slice.swap(0, slice.len() / 2);
    let (mut lt, mut i, mut gt) = (1, 1, slice.len());

    while i < gt {
        match compare(&slice[i], &slice[0]) {
            Ordering::Less => {
                slice.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                slice.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }

    slice.swap(0, lt - 1);
    (lt - 1, gt)
}

// ============================================================================
// Heap sort
// ============================================================================

/// In-place heap sort over an implicit binary max-heap
pub fn heap_sort_by<T, F>(slice: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = slice.len();
    for start in (0..len / 2).rev() {
        sift_down(slice, start, len, &mut compare);
    }
    for end in (1..len).rev() {
        slice.swap(0, end);
        sift_down(slice, 0, end, &mut compare);
    }
}

pub fn heap_sort_by_key<T, K, F>(slice: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    heap_sort_by(slice, |a, b| key(a).cmp(&key(b)));
}

pub fn heap_sort<T: Ord>(slice: &mut [T]) {
    heap_sort_by(slice, T::cmp);
}

fn sift_down<T, F>(slice: &mut [T], mut root: usize, end: usize, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    loop {
        let left = 2 * root + 1;
        if left >= end {
            return;
        }
        let right = left + 1;
        let mut largest = root;
        if compare(&slice[left], &slice[largest]) == Ordering::Greater {
            largest = left;
        }
        if right < end && compare(&slice[right], &slice[largest]) == Ordering::Greater {
            largest = right;
        }
        if largest == root {
            return;
        }
        slice.swap(root, largest);
        root = largest;
    }
}

// ============================================================================
// Quadratic sorts
// ============================================================================

/// Bubble sort; stops after the first pass with no swaps
pub fn bubble_sort_by<T, F>(slice: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut unsorted = slice.len();
    while unsorted > 1 {
        let mut swapped = false;
        for i in 1..unsorted {
            if compare(&slice[i - 1], &slice[i]) == Ordering::Greater {
                slice.swap(i - 1, i);
                swapped = true;
            }
        }
        if !swapped {
            return;
        }
        unsorted -= 1;
    }
}

pub fn bubble_sort_by_key<T, K, F>(slice: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    bubble_sort_by(slice, |a, b| key(a).cmp(&key(b)));
}

pub fn bubble_sort<T: Ord>(slice: &mut [T]) {
    bubble_sort_by(slice, T::cmp);
}

/// Insertion sort; linear on already-sorted input
pub fn insertion_sort_by<T, F>(slice: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..slice.len() {
        let mut j = i;
        while j > 0 && compare(&slice[j - 1], &slice[j]) == Ordering::Greater {
            slice.swap(j - 1, j);
            j -= 1;
        }
    }
}

pub fn insertion_sort_by_key<T, K, F>(slice: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    insertion_sort_by(slice, |a, b| key(a).cmp(&key(b)));
}

pub fn insertion_sort<T: Ord>(slice: &mut [T]) {
    insertion_sort_by(slice, T::cmp);
}

// ============================================================================
// Unit Tests
// ============================================================================
