//! Property-based tests for the index invariants.

use std::collections::BTreeMap;

use proptest::prelude::*;

use vault_index::algorithms::search::{
    binary_search, exponential_search, interpolation_search, jump_search, linear_search,
};
use vault_index::algorithms::sort::{
    bubble_sort, heap_sort, insertion_sort, merge_sort, merge_sort_by_key, quick_sort,
};
use vault_index::{FastLookupCache, KeyedIndex, PriorityScheduler, Registry};

/// Insert (true) or remove (false) of a small key
fn op_strategy() -> impl Strategy<Value = Vec<(bool, u16)>> {
    prop::collection::vec((any::<bool>(), 0u16..512), 0..400)
}

/// Account-number-like keys
fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9]{1,8}").expect("Invalid regex")
}

proptest! {
    #[test]
    fn avl_stays_balanced(ops in op_strategy()) {
        let mut index = KeyedIndex::new();
        let mut model = BTreeMap::new();
        for (insert, key) in ops {
            if insert {
                prop_assert_eq!(index.insert(key, key), model.insert(key, key));
            } else {
                prop_assert_eq!(index.remove(&key), model.remove(&key));
            }
            prop_assert!(index.validate());
        }
        let keys: Vec<u16> = index.keys().into_iter().copied().collect();
        let expected: Vec<u16> = model.keys().copied().collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn cache_matches_model(entries in prop::collection::vec((key_strategy(), any::<u32>()), 0..300)) {
        let mut cache = FastLookupCache::with_buckets(4);
        let mut model = BTreeMap::new();
        for (key, value) in &entries {
            prop_assert_eq!(cache.insert(key.clone(), *value), model.insert(key.clone(), *value));
        }
        prop_assert_eq!(cache.len(), model.len());
        prop_assert!(cache.load_factor() <= cache.max_load_factor());
        for (key, value) in &model {
            prop_assert_eq!(cache.get(key.as_str()), Ok(value));
        }
    }

    #[test]
    fn registry_indexes_agree(entries in prop::collection::vec((key_strategy(), any::<bool>()), 0..200)) {
        let mut registry = Registry::new();
        for (i, (key, keep)) in entries.iter().enumerate() {
            registry.insert(key.clone(), i);
            if !keep {
                registry.remove(key.as_str());
            }
        }
        for (key, _) in &entries {
            prop_assert!(registry.indexes_agree(key.as_str()));
        }
        prop_assert_eq!(registry.tree().len(), registry.cache().len());
    }

    #[test]
    fn sorts_match_std(mut values in prop::collection::vec(any::<i32>(), 0..200)) {
        let mut expected = values.clone();
        expected.sort();

        let mut merged = values.clone();
        merge_sort(&mut merged);
        let mut quick = values.clone();
        quick_sort(&mut quick);
        let mut heaped = values.clone();
        heap_sort(&mut heaped);
        let mut inserted = values.clone();
        insertion_sort(&mut inserted);
        bubble_sort(&mut values);

        prop_assert_eq!(&merged, &expected);
        prop_assert_eq!(&quick, &expected);
        prop_assert_eq!(&heaped, &expected);
        prop_assert_eq!(&inserted, &expected);
        prop_assert_eq!(&values, &expected);
    }

    #[test]
    fn merge_sort_is_stable(values in prop::collection::vec(0u8..8, 0..200)) {
        let mut tagged: Vec<(u8, usize)> = values.iter().copied().zip(0..).collect();
        merge_sort_by_key(&mut tagged, |t| t.0);
        for pair in tagged.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
        }
    }

    #[test]
    fn searches_agree_with_linear(mut values in prop::collection::vec(0i64..1_000, 0..200), target in 0i64..1_000) {
        values.sort_unstable();
        let exists = linear_search(&values, &target).is_some();

        for found in [
            binary_search(&values, &target),
            jump_search(&values, &target),
            exponential_search(&values, &target),
            interpolation_search(&values, target),
        ] {
            prop_assert_eq!(found.is_some(), exists);
            if let Some(idx) = found {
                prop_assert_eq!(values[idx], target);
            }
        }
    }

    #[test]
    fn scheduler_ties_are_fifo(priorities in prop::collection::vec(0u8..4, 0..200)) {
        let mut scheduler = PriorityScheduler::new();
        for (seq, priority) in priorities.iter().enumerate() {
            scheduler.push(seq, *priority);
        }
        let order = scheduler.drain_ordered();
        prop_assert_eq!(order.len(), priorities.len());
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(
                priorities[a] > priorities[b] || (priorities[a] == priorities[b] && a < b)
            );
        }
    }
}
