//! Lookup algorithms over slices.
//!
//! Every search returns the index of a matching element, or `None`. When
//! the target occurs more than once, which duplicate is returned is
//! unspecified (except for [`linear_search`], which returns the first).
//!
//! # Panics
//!
//! All searches except [`linear_search`] require ascending input. In debug
//! builds unsorted input trips a `debug_assert!`; in release builds the
//! result is meaningless but the call does not panic.

use std::cmp::Ordering;

fn is_ascending<T: Ord>(slice: &[T]) -> bool {
    slice.windows(2).all(|w| w[0] <= w[1])
}

/// First index holding `target`. O(n), no ordering requirement
pub fn linear_search<T: PartialEq>(slice: &[T], target: &T) -> Option<usize> {
    slice.iter().position(|item| item == target)
}

/// Classic halving search. O(log n)
///
/// # Example
///
/// ```
/// use vault_index::algorithms::search::binary_search;
///
/// let ids = [3, 8, 15, 21, 40];
/// assert_eq!(binary_search(&ids, &21), Some(3));
/// assert_eq!(binary_search(&ids, &4), None);
/// ```
pub fn binary_search<T: Ord>(slice: &[T], target: &T) -> Option<usize> {
    binary_search_by_key(slice, target, |item| item)
}

/// Halving search on an extracted key
///
/// `slice` must be ascending by `key`.
pub fn binary_search_by_key<'a, T, K, F>(slice: &'a [T], target: &K, mut key: F) -> Option<usize>
where
    K: Ord + ?Sized + 'a,
    F: FnMut(&'a T) -> &'a K,
{
    debug_assert!(
        slice.windows(2).all(|w| key(&w[0]) <= key(&w[1])),
        "binary search over unsorted input"
    );

    let (mut lo, mut hi) = (0usize, slice.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match key(&slice[mid]).cmp(target) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    None
}

/// Search that estimates each position from the value distribution
///
/// O(log log n) on uniformly spread values; degrades toward O(n) on skewed
/// data (e.g. exponentially growing values).
pub fn interpolation_search<T>(slice: &[T], target: T) -> Option<usize>
where
    T: Copy + Ord + Into<i128>,
{
    debug_assert!(is_ascending(slice), "interpolation search over unsorted input");

    if slice.is_empty() {
        return None;
    }
    let target_v: i128 = target.into();
    let (mut lo, mut hi) = (0usize, slice.len() - 1);

    while lo <= hi {
        let lo_v: i128 = slice[lo].into();
        let hi_v: i128 = slice[hi].into();
        if target_v < lo_v || target_v > hi_v {
            return None;
        }
        if lo_v == hi_v {
            return (lo_v == target_v).then_some(lo);
        }

        let offset = (target_v - lo_v) * (hi - lo) as i128 / (hi_v - lo_v);
        let pos = lo + offset as usize;
        match slice[pos].cmp(&target) {
            Ordering::Equal => return Some(pos),
            Ordering::Less => lo = pos + 1,
            Ordering::Greater => {
                if pos == 0 {
                    return None;
                }
                hi = pos - 1;
            }
        }
    }
    None
}

/// Jump ahead in blocks of √n, then binary search the block. O(√n)
pub fn jump_search<T: Ord>(slice: &[T], target: &T) -> Option<usize> {
    debug_assert!(is_ascending(slice), "jump search over unsorted input");

    let len = slice.len();
    if len == 0 {
        return None;
    }
    let step = ((len as f64).sqrt() as usize).max(1);

    let mut block_start = 0;
    let mut block_end = step.min(len);
    while slice[block_end - 1] < *target {
        block_start = block_end;
        if block_start >= len {
            return None;
        }
        block_end = (block_end + step).min(len);
    }

    binary_search(&slice[block_start..block_end], target).map(|offset| block_start + offset)
}

/// Double the bound until it passes `target`, then binary search the last
/// range. O(log i) where `i` is the target's position
pub fn exponential_search<T: Ord>(slice: &[T], target: &T) -> Option<usize> {
    debug_assert!(is_ascending(slice), "exponential search over unsorted input");

    let first = slice.first()?;
    if first == target {
        return Some(0);
    }

    let mut bound = 1;
    while bound < slice.len() && slice[bound] <= *target {
        bound *= 2;
    }

    let lo = bound / 2;
    let hi = (bound + 1).min(slice.len());
    binary_search(&slice[lo..hi], target).map(|offset| lo + offset)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SORTED: [u64; 10] = [2, 5, 9, 14, 20, 33, 47, 60, 81, 99];

    fn every_search(target: u64) -> [Option<usize>; 5] {
        [
            linear_search(&SORTED, &target),
            binary_search(&SORTED, &target),
            interpolation_search(&SORTED, target),
            jump_search(&SORTED, &target),
            exponential_search(&SORTED, &target),
        ]
    }

    #[test]
    fn test_all_searches_find_every_element() {
        for (i, &value) in SORTED.iter().enumerate() {
            for result in every_search(value) {
                assert_eq!(result, Some(i), "value {value}");
            }
        }
    }

    #[test]
    fn test_all_searches_miss() {
        for missing in [0, 1, 3, 50, 98, 100, 1_000] {
            for result in every_search(missing) {
                assert_eq!(result, None, "value {missing}");
            }
        }
    }

    #[test]
    fn test_empty_slice() {
        let empty: [u64; 0] = [];
        assert_eq!(linear_search(&empty, &1), None);
        assert_eq!(binary_search(&empty, &1), None);
        assert_eq!(interpolation_search(&empty, 1), None);
        assert_eq!(jump_search(&empty, &1), None);
        assert_eq!(exponential_search(&empty, &1), None);
    }

    #[test]
    fn test_interpolation_on_skewed_data() {
        let skewed: Vec<u64> = (0..40).map(|i| 1u64 << i).collect();
        for (i, &v) in skewed.iter().enumerate() {
            assert_eq!(interpolation_search(&skewed, v), Some(i));
        }
        assert_eq!(interpolation_search(&skewed, 3), None);
    }

    #[test]
    fn test_interpolation_on_constant_run() {
        let flat = [7u32; 5];
        assert!(interpolation_search(&flat, 7).is_some());
        assert_eq!(interpolation_search(&flat, 8), None);
    }

    #[test]
    fn test_binary_search_by_key() {
        let accounts = [("a1", 10u64), ("b2", 20), ("c3", 30)];
        assert_eq!(binary_search_by_key(&accounts, "b2", |a| a.0), Some(1));
        assert_eq!(binary_search_by_key(&accounts, "zz", |a| a.0), None);
    }

    #[test]
    fn test_binary_search_by_unsized_key() {
        let numbers: Vec<String> = ["acc1", "acc4", "acc7"].iter().map(|s| s.to_string()).collect();
        assert_eq!(binary_search_by_key(&numbers, "acc7", |n| n.as_str()), Some(2));
        assert_eq!(binary_search_by_key(&numbers, "acc2", String::as_str), None);
    }

    #[test]
    fn test_linear_search_returns_first_duplicate() {
        assert_eq!(linear_search(&[4, 1, 4, 4], &4), Some(0));
    }

    #[test]
    #[should_panic(expected = "unsorted")]
    #[cfg(debug_assertions)]
    fn test_unsorted_input_is_contract_violation() {
        binary_search(&[3, 1, 2], &1);
    }
}
