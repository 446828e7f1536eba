//! Ordering and lookup algorithms used by the services.
//!
//! - [`sort`]: merge, quick, heap, bubble and insertion sort, in place
//! - [`search`]: linear, binary, interpolation, jump and exponential search

pub mod search;
pub mod sort;

pub use search::{
    binary_search, binary_search_by_key, exponential_search, interpolation_search, jump_search,
    linear_search,
};
pub use sort::{
    bubble_sort, bubble_sort_by_key, heap_sort, heap_sort_by_key, insertion_sort,
    insertion_sort_by_key, merge_sort, merge_sort_by, merge_sort_by_key, quick_sort,
    quick_sort_by, quick_sort_by_key,
};
