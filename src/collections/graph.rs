//! Weighted directed graph over account or customer identifiers.
//!
//! Adjacency lists keyed by vertex. Edges are directed, weights are `u64`
//! (minor units for transfers), and parallel edges between the same pair
//! are kept: every transfer is its own edge.
//!
//! Traversals are iterative (explicit stack for DFS, queue for BFS).
//! [`RelationshipGraph::dijkstra`] runs the lazy-deletion variant over a
//! [`BinaryHeap`]; weights cannot be negative by construction.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Outgoing edge in an adjacency list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedEdge<V> {
    /// Destination vertex
    pub to: V,
    /// Edge weight
    pub weight: u64,
}

/// Directed multigraph with non-negative integer weights
#[derive(Debug, Clone)]
pub struct RelationshipGraph<V> {
    adjacency: HashMap<V, Vec<WeightedEdge<V>>>,
    edge_count: usize,
}

impl<V: Clone + Eq + Hash> Default for RelationshipGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Eq + Hash> RelationshipGraph<V> {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
            edge_count: 0,
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Add `v` with no edges; no-op if present
    pub fn add_vertex(&mut self, v: V) {
        self.adjacency.entry(v).or_default();
    }

    /// Append edge `from -> to`, creating either vertex as needed
    pub fn add_edge(&mut self, from: V, to: V, weight: u64) {
        self.add_vertex(to.clone());
        self.adjacency
            .entry(from)
            .or_default()
            .push(WeightedEdge { to, weight });
        self.edge_count += 1;
    }

    /// Remove every edge `from -> to`, returning how many were removed
    pub fn remove_edge(&mut self, from: &V, to: &V) -> usize {
        let Some(edges) = self.adjacency.get_mut(from) else {
            return 0;
        };
        let before = edges.len();
        edges.retain(|edge| &edge.to != to);
        let removed = before - edges.len();
        self.edge_count -= removed;
        removed
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Outgoing edges of `v`; empty for an unknown vertex
    pub fn neighbors(&self, v: &V) -> &[WeightedEdge<V>] {
        self.adjacency.get(v).map_or(&[], Vec::as_slice)
    }

    pub fn has_edge(&self, from: &V, to: &V) -> bool {
        self.neighbors(from).iter().any(|edge| &edge.to == to)
    }

    /// Sum of the weights of every `from -> to` edge
    pub fn total_weight(&self, from: &V, to: &V) -> u64 {
        self.neighbors(from)
            .iter()
            .filter(|edge| &edge.to == to)
            .fold(0u64, |acc, edge| acc.saturating_add(edge.weight))
    }

    pub fn contains_vertex(&self, v: &V) -> bool {
        self.adjacency.contains_key(v)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Vertices reachable from `start` (inclusive), depth first
    ///
    /// An unknown start yields just `{start}`.
    pub fn depth_first_search(&self, start: &V) -> HashSet<V> {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(v) = stack.pop() {
            if !visited.insert(v.clone()) {
                continue;
            }
            // Reverse so the first-listed neighbour is explored first.
            for edge in self.neighbors(v).iter().rev() {
                if !visited.contains(&edge.to) {
                    stack.push(&edge.to);
                }
            }
        }
        visited
    }

    /// Vertices reachable from `start` (inclusive), breadth first
    pub fn breadth_first_search(&self, start: &V) -> HashSet<V> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start.clone());
        queue.push_back(start);

        while let Some(v) = queue.pop_front() {
            for edge in self.neighbors(v) {
                if visited.insert(edge.to.clone()) {
                    queue.push_back(&edge.to);
                }
            }
        }
        visited
    }

    /// Single-source shortest paths
    ///
    /// # Example
    ///
    /// ```
    /// use vault_index::collections::RelationshipGraph;
    ///
    /// let mut graph = RelationshipGraph::new();
    /// graph.add_edge("A", "B", 5);
    /// graph.add_edge("B", "C", 3);
    /// graph.add_edge("A", "C", 10);
    ///
    /// let paths = graph.dijkstra(&"A");
    /// assert_eq!(paths.distance(&"A"), Some(0));
    /// assert_eq!(paths.distance(&"B"), Some(5));
    /// assert_eq!(paths.distance(&"C"), Some(8));
    /// ```
    pub fn dijkstra(&self, start: &V) -> ShortestPaths<V> {
        let mut distances: HashMap<V, u64> = HashMap::with_capacity(self.adjacency.len());
        distances.insert(start.clone(), 0);

        // Heap entries: (Reverse(distance), insertion counter, vertex). The
        // counter keeps ordering total without requiring `V: Ord`.
        let mut heap = BinaryHeap::new();
        let mut counter = 0u64;
        let mut lookup: Vec<&V> = vec![start];
        heap.push((Reverse(0u64), Reverse(counter), 0usize));

        while let Some((Reverse(dist), _, at)) = heap.pop() {
            let v = lookup[at];
            if distances.get(v).is_some_and(|&best| dist > best) {
                continue;
            }

            for edge in self.neighbors(v) {
                let candidate = dist.saturating_add(edge.weight);
                let improved = distances
                    .get(&edge.to)
                    .map_or(true, |&current| candidate < current);
                if improved {
                    distances.insert(edge.to.clone(), candidate);
                    counter += 1;
                    lookup.push(&edge.to);
                    heap.push((Reverse(candidate), Reverse(counter), lookup.len() - 1));
                }
            }
        }

        for v in self.adjacency.keys() {
            distances.entry(v.clone()).or_insert(u64::MAX);
        }
        ShortestPaths { distances }
    }
}

// ============================================================================
// Shortest-path result
// ============================================================================

/// Distances from one source vertex
///
/// Unreachable vertices are stored as infinity and reported as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths<V: Eq + Hash> {
    distances: HashMap<V, u64>,
}

impl<V: Eq + Hash> ShortestPaths<V> {
    /// Distance to `v`; `None` when unreachable or unknown
    pub fn distance(&self, v: &V) -> Option<u64> {
        self.distances.get(v).copied().filter(|&d| d != u64::MAX)
    }

    pub fn is_reachable(&self, v: &V) -> bool {
        self.distance(v).is_some()
    }

    /// Every known vertex with its distance (`None` = infinity)
    pub fn iter(&self) -> impl Iterator<Item = (&V, Option<u64>)> {
        self.distances
            .iter()
            .map(|(v, &d)| (v, (d != u64::MAX).then_some(d)))
    }

    /// Reachable vertices only
    pub fn reachable(&self) -> impl Iterator<Item = (&V, u64)> {
        self.iter().filter_map(|(v, d)| d.map(|d| (v, d)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Raw map; unreachable vertices map to `u64::MAX`
    pub fn into_map(self) -> HashMap<V, u64> {
        self.distances
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RelationshipGraph<&'static str> {
        let mut graph = RelationshipGraph::new();
        graph.add_edge("A", "B", 5);
        graph.add_edge("B", "C", 3);
        graph.add_edge("A", "C", 10);
        graph.add_edge("D", "A", 1);
        graph
    }

    #[test]
    fn test_add_edge_creates_vertices() {
        let graph = sample();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.has_edge(&"A", &"B"));
        assert!(!graph.has_edge(&"B", &"A"));
        assert!(graph.neighbors(&"C").is_empty());
        assert!(graph.neighbors(&"Z").is_empty());
    }

    #[test]
    fn test_parallel_edges_and_remove() {
        let mut graph = RelationshipGraph::new();
        graph.add_edge("A", "B", 40);
        graph.add_edge("A", "B", 60);

        assert_eq!(graph.neighbors(&"A").len(), 2);
        assert_eq!(graph.total_weight(&"A", &"B"), 100);

        assert_eq!(graph.remove_edge(&"A", &"B"), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.contains_vertex(&"B"));
        assert_eq!(graph.remove_edge(&"X", &"B"), 0);
    }

    #[test]
    fn test_dfs_and_bfs_reach_same_set() {
        let graph = sample();
        let dfs = graph.depth_first_search(&"A");
        let bfs = graph.breadth_first_search(&"A");

        let expected: HashSet<&str> = ["A", "B", "C"].into_iter().collect();
        assert_eq!(dfs, expected);
        assert_eq!(bfs, expected);
    }

    #[test]
    fn test_traversal_unknown_start() {
        let graph = sample();
        let dfs = graph.depth_first_search(&"Z");
        assert_eq!(dfs.len(), 1);
        assert!(dfs.contains("Z"));
    }

    #[test]
    fn test_traversal_handles_cycles() {
        let mut graph = RelationshipGraph::new();
        graph.add_edge(1u32, 2, 1);
        graph.add_edge(2, 3, 1);
        graph.add_edge(3, 1, 1);

        assert_eq!(graph.depth_first_search(&1).len(), 3);
        assert_eq!(graph.breadth_first_search(&2).len(), 3);
    }

    #[test]
    fn test_dijkstra_prefers_cheaper_path() {
        let paths = sample().dijkstra(&"A");

        assert_eq!(paths.distance(&"A"), Some(0));
        assert_eq!(paths.distance(&"B"), Some(5));
        assert_eq!(paths.distance(&"C"), Some(8));
        assert_eq!(paths.distance(&"D"), None);
        assert!(!paths.is_reachable(&"D"));
        assert_eq!(paths.reachable().count(), 3);
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn test_dijkstra_unknown_start() {
        let paths = sample().dijkstra(&"Z");
        assert_eq!(paths.distance(&"Z"), Some(0));
        assert_eq!(paths.reachable().count(), 1);
    }

    #[test]
    fn test_dijkstra_saturates() {
        let mut graph = RelationshipGraph::new();
        graph.add_edge("A", "B", u64::MAX - 1);
        graph.add_edge("B", "C", 10);

        let paths = graph.dijkstra(&"A");
        assert_eq!(paths.distance(&"B"), Some(u64::MAX - 1));
        // Saturated sum equals the infinity sentinel
        assert_eq!(paths.distance(&"C"), None);
    }
}
