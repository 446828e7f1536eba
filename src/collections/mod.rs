//! Generic in-memory data structures.
//!
//! ## Components
//!
//! - [`KeyedIndex`]: AVL tree over slab-allocated [`IndexNode`]s
//! - [`FastLookupCache`]: chained hash table with doubling rehash
//! - [`Registry`]: entity arena indexed by both of the above
//! - [`RelationshipGraph`]: weighted directed multigraph with DFS, BFS and
//!   Dijkstra
//! - [`PriorityScheduler`]: max-priority queue, FIFO among equal priorities
//!
//! Everything here is single-threaded and mutated through `&mut self`.

pub mod avl;
pub mod graph;
pub mod hash_table;
pub mod node;
pub mod registry;
pub mod scheduler;

pub use avl::KeyedIndex;
pub use graph::{RelationshipGraph, ShortestPaths, WeightedEdge};
pub use hash_table::{CacheSlot, FastLookupCache};
pub use node::IndexNode;
pub use registry::Registry;
pub use scheduler::{PriorityScheduler, ScheduledItem};
