//! Dense all-pairs shortest paths for facility-placement style queries.
//!
//! The matrix is a snapshot of the live weights at build time. Later traffic
//! updates are not observed; rebuild with [`all_pairs`] to pick them up.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use crate::graph::{Graph, NodeId};
use crate::path::elapsed_ns;

/// All-pairs distance and next-hop matrices.
#[derive(Debug, Clone)]
pub struct AllPairs {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    distances: Vec<f64>,
    next_hop: Vec<Option<usize>>,
}

/// Best candidate site for a new station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationSite {
    pub node: NodeId,
    /// Longest distance from the site to any demand node.
    pub worst_case: f64,
    pub total: f64,
}

/// How well a set of stations covers the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageStats {
    pub covered: usize,
    pub total: usize,
    pub ratio: f64,
    /// Mean distance from the nearest station over reachable nodes.
    pub mean_nearest: f64,
}

/// Build the all-pairs matrices for `graph`. O(V³) time, O(V²) memory.
pub fn all_pairs(graph: &Graph) -> AllPairs {
    AllPairs::build(graph)
}

impl AllPairs {
    pub fn build(graph: &Graph) -> Self {
        let started = Instant::now();
        let ids = graph.node_ids().to_vec();
        let n = ids.len();
        let index: HashMap<NodeId, usize> =
            ids.iter().enumerate().map(|(slot, &id)| (id, slot)).collect();

        let mut distances = vec![f64::INFINITY; n * n];
        let mut next_hop = vec![None; n * n];

        for (i, &id) in ids.iter().enumerate() {
            distances[i * n + i] = 0.0;
            next_hop[i * n + i] = Some(i);
            for edge in graph.neighbours(id) {
                let Some(&j) = index.get(&edge.target) else {
                    continue;
                };
                let weight = graph.dynamic_weight(id, edge);
                if weight < distances[i * n + j] {
                    distances[i * n + j] = weight;
                    next_hop[i * n + j] = Some(j);
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                let through = distances[i * n + k];
                if through.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = through + distances[k * n + j];
                    if candidate < distances[i * n + j] {
                        distances[i * n + j] = candidate;
                        next_hop[i * n + j] = next_hop[i * n + k];
                    }
                }
            }
        }

        tracing::debug!(
            nodes = n,
            elapsed_ns = elapsed_ns(started),
            "built all-pairs matrix"
        );

        Self {
            ids,
            index,
            distances,
            next_hop,
        }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Shortest distance from `a` to `b`; infinite when unreachable or unknown.
    pub fn distance(&self, a: NodeId, b: NodeId) -> f64 {
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(&i), Some(&j)) => self.distances[i * self.ids.len() + j],
            _ => f64::INFINITY,
        }
    }

    /// Shortest path from `a` to `b` following next hops; empty when none.
    pub fn path(&self, a: NodeId, b: NodeId) -> Vec<NodeId> {
        let (Some(&i), Some(&j)) = (self.index.get(&a), self.index.get(&b)) else {
            return Vec::new();
        };
        let n = self.ids.len();
        let mut path = vec![self.ids[i]];
        let mut current = i;
        while current != j {
            match self.next_hop[current * n + j] {
                Some(hop) if path.len() <= n => {
                    path.push(self.ids[hop]);
                    current = hop;
                }
                _ => return Vec::new(),
            }
        }
        path
    }

    /// Pick the candidate minimising the worst-case distance to `demand`.
    /// Ties go to the lower total distance, then the lower id. Candidates
    /// that cannot reach every demand node are ignored.
    pub fn best_station_site(&self, candidates: &[NodeId], demand: &[NodeId]) -> Option<StationSite> {
        candidates
            .iter()
            .filter(|id| self.index.contains_key(id))
            .map(|&node| {
                let mut worst_case: f64 = 0.0;
                let mut total = 0.0;
                for &target in demand {
                    let distance = self.distance(node, target);
                    worst_case = worst_case.max(distance);
                    total += distance;
                }
                StationSite {
                    node,
                    worst_case,
                    total,
                }
            })
            .filter(|site| site.worst_case.is_finite())
            .min_by(|a, b| {
                a.worst_case
                    .total_cmp(&b.worst_case)
                    .then_with(|| a.total.total_cmp(&b.total))
                    .then_with(|| a.node.cmp(&b.node))
            })
    }

    /// Share of nodes within `radius` of their nearest station.
    pub fn coverage(&self, stations: &[NodeId], radius: f64) -> CoverageStats {
        let total = self.ids.len();
        let mut covered = 0;
        let mut reachable = 0;
        let mut nearest_sum = 0.0;

        for &node in &self.ids {
            let nearest = stations
                .iter()
                .map(|&station| self.distance(station, node))
                .fold(f64::INFINITY, f64::min);
            if nearest.is_finite() {
                reachable += 1;
                nearest_sum += nearest;
            }
            if nearest <= radius {
                covered += 1;
            }
        }

        CoverageStats {
            covered,
            total,
            ratio: if total == 0 {
                0.0
            } else {
                covered as f64 / total as f64
            },
            mean_nearest: if reachable == 0 {
                f64::INFINITY
            } else {
                nearest_sum / reachable as f64
            },
        }
    }
}
