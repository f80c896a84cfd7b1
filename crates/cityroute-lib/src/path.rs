use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::graph::NodeId;

/// Search procedure that produced a [`SearchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Dijkstra,
    AStarEuclidean,
    AStarManhattan,
    AStarZero,
    AStarAdaptive,
    /// Penalised re-search used for alternative routes.
    PenalizedDijkstra,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStarEuclidean => "a-star-euclidean",
            Algorithm::AStarManhattan => "a-star-manhattan",
            Algorithm::AStarZero => "a-star-zero",
            Algorithm::AStarAdaptive => "a-star-adaptive",
            Algorithm::PenalizedDijkstra => "penalized-dijkstra",
        };
        f.write_str(value)
    }
}

/// Outcome of a single-pair query.
///
/// An empty `path` with infinite `distance` means no route exists or an
/// endpoint is unknown; callers that care can check node existence first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub path: Vec<NodeId>,
    pub distance: f64,
    pub algorithm: Algorithm,
    /// Queue pops performed. Diagnostic only.
    pub nodes_explored: usize,
    pub compute_time_ns: u64,
}

impl SearchResult {
    pub(crate) fn not_found(algorithm: Algorithm, nodes_explored: usize, started: Instant) -> Self {
        Self {
            path: Vec::new(),
            distance: f64::INFINITY,
            algorithm,
            nodes_explored,
            compute_time_ns: elapsed_ns(started),
        }
    }

    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of roads travelled.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

pub(crate) fn elapsed_ns(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Walk the predecessor chain back from `goal`. Returns an empty path when
/// the chain does not lead to `start`.
pub(crate) fn reconstruct_path(
    predecessors: &HashMap<NodeId, NodeId>,
    start: NodeId,
    goal: NodeId,
) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match predecessors.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
