//! Dijkstra shortest paths over live traffic weights.
//!
//! Edge costs are read from the graph at relaxation time, never cached, so a
//! search always reflects the multipliers in force while it runs.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::graph::{Edge, Graph, NodeId};
use crate::path::{elapsed_ns, reconstruct_path, Algorithm, SearchResult};
use crate::queue::IndexedMinQueue;

/// Distances and predecessors from one source to every reachable node.
#[derive(Debug, Clone, Default)]
pub struct ShortestPathTree {
    source: NodeId,
    distances: HashMap<NodeId, f64>,
    predecessors: HashMap<NodeId, NodeId>,
    nodes_explored: usize,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest distance to `target`, infinite when unreachable.
    pub fn distance_to(&self, target: NodeId) -> f64 {
        self.distances
            .get(&target)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Shortest path to `target`, empty when unreachable.
    pub fn path_to(&self, target: NodeId) -> Vec<NodeId> {
        if !self.distances.contains_key(&target) {
            return Vec::new();
        }
        reconstruct_path(&self.predecessors, self.source, target)
    }

    pub fn is_reachable(&self, target: NodeId) -> bool {
        self.distances.contains_key(&target)
    }

    /// Reachable nodes, including the source.
    pub fn reachable(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.distances.keys().copied()
    }

    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }
}

/// Compute shortest distances from `source` to every reachable node.
pub fn shortest_paths(graph: &Graph, source: NodeId) -> ShortestPathTree {
    let search = run(graph, source, None, |from, edge| {
        graph.dynamic_weight(from, edge)
    });
    ShortestPathTree {
        source,
        distances: search.distances,
        predecessors: search.predecessors,
        nodes_explored: search.nodes_explored,
    }
}

/// Compute the shortest path from `source` to `target`, stopping as soon as
/// `target` is settled.
pub fn shortest_path(graph: &Graph, source: NodeId, target: NodeId) -> SearchResult {
    shortest_path_with(graph, source, target, Algorithm::Dijkstra, |from, edge| {
        graph.dynamic_weight(from, edge)
    })
}

/// Single-pair search with a caller-supplied edge cost. The reported
/// distance is the search cost; callers substituting penalised weights
/// recompute the true distance themselves.
pub(crate) fn shortest_path_with<W>(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    algorithm: Algorithm,
    weight: W,
) -> SearchResult
where
    W: Fn(NodeId, &Edge) -> f64,
{
    let started = Instant::now();
    if !graph.contains(source) || !graph.contains(target) {
        return SearchResult::not_found(algorithm, 0, started);
    }

    let search = run(graph, source, Some(target), weight);
    if !search.settled.contains(&target) {
        return SearchResult::not_found(algorithm, search.nodes_explored, started);
    }

    SearchResult {
        path: reconstruct_path(&search.predecessors, source, target),
        distance: search.distances[&target],
        algorithm,
        nodes_explored: search.nodes_explored,
        compute_time_ns: elapsed_ns(started),
    }
}

struct Search {
    distances: HashMap<NodeId, f64>,
    predecessors: HashMap<NodeId, NodeId>,
    settled: HashSet<NodeId>,
    nodes_explored: usize,
}

fn run<W>(graph: &Graph, source: NodeId, target: Option<NodeId>, weight: W) -> Search
where
    W: Fn(NodeId, &Edge) -> f64,
{
    let mut search = Search {
        distances: HashMap::new(),
        predecessors: HashMap::new(),
        settled: HashSet::new(),
        nodes_explored: 0,
    };
    if !graph.contains(source) {
        return search;
    }

    let mut queue = IndexedMinQueue::with_capacity(graph.node_count());
    search.distances.insert(source, 0.0);
    queue.insert(source, 0.0);

    while let Some((node, distance)) = queue.extract_min() {
        search.nodes_explored += 1;
        search.settled.insert(node);
        if target == Some(node) {
            break;
        }

        for edge in graph.neighbours(node) {
            let next = edge.target;
            if search.settled.contains(&next) {
                continue;
            }
            let candidate = distance + weight(node, edge);
            if candidate >= search.distances.get(&next).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            search.distances.insert(next, candidate);
            search.predecessors.insert(next, node);
            if !queue.insert(next, candidate) {
                queue.decrease_key(next, candidate);
            }
        }
    }

    search
}
