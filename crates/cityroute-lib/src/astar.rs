//! A* search with pluggable heuristics.
//!
//! Heuristics estimate in coordinate units. They stay admissible only while
//! every live edge cost is at least the geometric distance it spans, so maps
//! whose base weights undercut their coordinates, or multipliers below 1.0,
//! forfeit the optimality guarantee. Manhattan additionally assumes
//! grid-aligned streets.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::time::Instant;

use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};
use crate::path::{elapsed_ns, reconstruct_path, Algorithm, SearchResult};
use crate::queue::IndexedMinQueue;

/// Built-in remaining-distance estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    Euclidean,
    Manhattan,
    /// Always zero; reduces A* to Dijkstra.
    Zero,
}

impl Heuristic {
    /// Estimated remaining cost from `from` to `goal`. Nodes without a known
    /// position estimate zero.
    pub fn estimate(self, graph: &Graph, from: NodeId, goal: NodeId) -> f64 {
        let (Some(current), Some(target)) = (graph.position(from), graph.position(goal)) else {
            return 0.0;
        };
        match self {
            Heuristic::Euclidean => current.euclidean_to(&target),
            Heuristic::Manhattan => current.manhattan_to(&target),
            Heuristic::Zero => 0.0,
        }
    }

    pub fn algorithm(self) -> Algorithm {
        match self {
            Heuristic::Euclidean => Algorithm::AStarEuclidean,
            Heuristic::Manhattan => Algorithm::AStarManhattan,
            Heuristic::Zero => Algorithm::AStarZero,
        }
    }
}

/// Run A* from `source` to `target` guided by `heuristic`.
pub fn a_star(graph: &Graph, source: NodeId, target: NodeId, heuristic: Heuristic) -> SearchResult {
    search(graph, source, target, heuristic.algorithm(), |node| {
        heuristic.estimate(graph, node, target)
    })
}

/// Default number of learned (node, goal) estimates kept by
/// [`AdaptiveAStar::new`].
pub const DEFAULT_LEARNED_CAPACITY: usize = 100_000;

/// A* that remembers the remaining distances it actually achieved and uses
/// them to sharpen later estimates towards the same goal.
///
/// Learned values come from settled shortest paths, so they never exceed the
/// true remaining cost for the traffic state they were observed under. Call
/// [`AdaptiveAStar::reset`] whenever multipliers change. The store is an LRU
/// bounded by its capacity; evicted estimates fall back to the base
/// heuristic.
#[derive(Debug)]
pub struct AdaptiveAStar {
    base: Heuristic,
    learned: LruCache<(NodeId, NodeId), f64>,
}

impl AdaptiveAStar {
    pub fn new(base: Heuristic) -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_LEARNED_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::with_capacity(base, capacity)
    }

    /// Keep at most `capacity` learned estimates.
    pub fn with_capacity(base: Heuristic, capacity: NonZeroUsize) -> Self {
        Self {
            base,
            learned: LruCache::new(capacity),
        }
    }

    pub fn base(&self) -> Heuristic {
        self.base
    }

    /// Learned remaining distance from `node` to `goal`, if any.
    pub fn learned(&self, node: NodeId, goal: NodeId) -> Option<f64> {
        self.learned.peek(&(node, goal)).copied()
    }

    pub fn learned_len(&self) -> usize {
        self.learned.len()
    }

    pub fn learned_capacity(&self) -> usize {
        self.learned.cap().get()
    }

    pub fn reset(&mut self) {
        self.learned.clear();
    }

    /// Estimate used for `node` towards `goal`: the larger of the base
    /// heuristic and the learned value.
    pub fn estimate(&self, graph: &Graph, node: NodeId, goal: NodeId) -> f64 {
        let base = self.base.estimate(graph, node, goal);
        match self.learned(node, goal) {
            Some(learned) => base.max(learned),
            None => base,
        }
    }

    pub fn search(&mut self, graph: &Graph, source: NodeId, target: NodeId) -> SearchResult {
        let result = search(graph, source, target, Algorithm::AStarAdaptive, |node| {
            self.estimate(graph, node, target)
        });
        if result.found() {
            self.learn(graph, &result.path);
        }
        result
    }

    fn learn(&mut self, graph: &Graph, path: &[NodeId]) {
        let Some(&goal) = path.last() else {
            return;
        };
        let mut remaining = 0.0;
        for pair in path.windows(2).rev() {
            let Some(hop) = graph.direct_weight(pair[0], pair[1]) else {
                return;
            };
            remaining += hop;
            let key = (pair[0], goal);
            let value = match self.learned.get(&key) {
                Some(&known) => known.min(remaining),
                None => remaining,
            };
            self.learned.put(key, value);
        }
    }
}

fn search<H>(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    algorithm: Algorithm,
    heuristic: H,
) -> SearchResult
where
    H: Fn(NodeId) -> f64,
{
    let started = Instant::now();
    if !graph.contains(source) || !graph.contains(target) {
        return SearchResult::not_found(algorithm, 0, started);
    }

    let mut open = IndexedMinQueue::new();
    let mut closed: HashSet<NodeId> = HashSet::new();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeId, NodeId> = HashMap::new();
    let mut nodes_explored = 0;

    g_score.insert(source, 0.0);
    open.insert(source, heuristic(source));

    while let Some((node, _)) = open.extract_min() {
        nodes_explored += 1;
        let current = g_score[&node];
        if node == target {
            return SearchResult {
                path: reconstruct_path(&predecessors, source, target),
                distance: current,
                algorithm,
                nodes_explored,
                compute_time_ns: elapsed_ns(started),
            };
        }
        closed.insert(node);

        for edge in graph.neighbours(node) {
            let next = edge.target;
            let tentative = current + graph.dynamic_weight(node, edge);
            if tentative >= g_score.get(&next).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            // A cheaper route to a closed node reopens it; learned estimates
            // are admissible but not always consistent.
            closed.remove(&next);
            g_score.insert(next, tentative);
            predecessors.insert(next, node);
            let f_score = tentative + heuristic(next);
            if !open.insert(next, f_score) {
                open.decrease_key(next, f_score);
            }
        }
    }

    SearchResult::not_found(algorithm, nodes_explored, started)
}
