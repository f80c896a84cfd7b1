//! Routing facade: algorithm selection, bounded caching and traffic updates.
//!
//! A [`Router`] owns the shared graph and an LRU cache of results keyed by
//! `(origin, destination, strategy)`. Traffic updates write the new
//! multipliers and drop every cached route under the same lock, so no caller
//! observes new traffic alongside cached routes computed under the old one.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cityroute_lib::{Graph, Position, RoadType, RouteStrategy, Router, RouterConfig};
//!
//! let mut builder = Graph::builder();
//! builder.add_node(1, Position::new(0.0, 0.0))?;
//! builder.add_node(2, Position::new(1.0, 0.0))?;
//! builder.add_edge(1, 2, 1.5, RoadType::Street)?;
//! let router = Router::new(Arc::new(builder.build()), RouterConfig::default())?;
//!
//! let result = router.route(1, 2, RouteStrategy::Balanced);
//! assert_eq!(result.path, vec![1, 2]);
//! # Ok::<(), cityroute_lib::Error>(())
//! ```

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::astar::{a_star, AdaptiveAStar, Heuristic};
use crate::cache::{RouteCache, RouteKey, DEFAULT_CACHE_CAPACITY};
use crate::dijkstra::{shortest_path, shortest_path_with};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::{elapsed_ns, Algorithm, SearchResult};

/// Straight-line distance above which A* replaces Dijkstra.
pub const DEFAULT_ASTAR_THRESHOLD: f64 = 10.0;

/// Weight multiplier applied to each road of a previously found path when
/// searching for alternatives. Compounds across rounds.
const ALTERNATIVE_PENALTY: f64 = 2.0;

/// Optimization objective requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Minimise travel time; always heuristic-guided (Euclidean).
    Fastest,
    /// Minimise distance; Manhattan-guided A* on long trips.
    Shortest,
    /// Dijkstra for short trips, Euclidean A* for long ones.
    #[default]
    Balanced,
}

impl RouteStrategy {
    fn prefers_travel_time(self) -> bool {
        matches!(self, RouteStrategy::Fastest)
    }

    fn heuristic(self) -> Heuristic {
        match self {
            RouteStrategy::Shortest => Heuristic::Manhattan,
            RouteStrategy::Fastest | RouteStrategy::Balanced => Heuristic::Euclidean,
        }
    }
}

/// Router tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Maximum number of cached routes.
    pub cache_capacity: usize,
    /// Straight-line distance above which A* is used.
    pub astar_threshold: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            astar_threshold: DEFAULT_ASTAR_THRESHOLD,
        }
    }
}

impl RouterConfig {
    /// Check ranges, returning the cache capacity as a non-zero value.
    pub fn validate(&self) -> Result<NonZeroUsize> {
        if !self.astar_threshold.is_finite() || self.astar_threshold < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "astar_threshold must be finite and non-negative, got {}",
                    self.astar_threshold
                ),
            });
        }
        NonZeroUsize::new(self.cache_capacity).ok_or_else(|| Error::InvalidConfig {
            message: "cache_capacity must be at least 1".to_string(),
        })
    }
}

/// Counters exposed for external reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouterStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_hit_rate: f64,
    /// Mean compute time of the queries that missed the cache.
    pub avg_compute_time_ns: f64,
    pub cache_size: usize,
}

#[derive(Debug)]
struct RouterState {
    cache: RouteCache,
    /// Bumped on every traffic update; results computed under an older
    /// generation are not cached.
    generation: u64,
    total_requests: u64,
    cache_hits: u64,
    computed: u64,
    compute_time_ns: u128,
}

impl RouterState {
    fn record_computation(&mut self, result: &SearchResult) {
        self.computed += 1;
        self.compute_time_ns += u128::from(result.compute_time_ns);
    }
}

/// Thread-safe routing facade over a shared [`Graph`].
#[derive(Debug)]
pub struct Router {
    graph: Arc<Graph>,
    config: RouterConfig,
    state: Mutex<RouterState>,
    adaptive: Mutex<AdaptiveAStar>,
}

impl Router {
    pub fn new(graph: Arc<Graph>, config: RouterConfig) -> Result<Self> {
        let capacity = config.validate()?;
        Ok(Self {
            graph,
            config,
            state: Mutex::new(RouterState {
                cache: RouteCache::new(capacity),
                generation: 0,
                total_requests: 0,
                cache_hits: 0,
                computed: 0,
                compute_time_ns: 0,
            }),
            adaptive: Mutex::new(AdaptiveAStar::new(Heuristic::Euclidean)),
        })
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    fn state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Heuristic to use for a query, or `None` for plain Dijkstra.
    pub fn select_heuristic(
        &self,
        origin: NodeId,
        destination: NodeId,
        strategy: RouteStrategy,
    ) -> Option<Heuristic> {
        let straight_line = self
            .graph
            .straight_line(origin, destination)
            .unwrap_or(0.0);
        if strategy.prefers_travel_time() || straight_line > self.config.astar_threshold {
            Some(strategy.heuristic())
        } else {
            None
        }
    }

    /// Route between two nodes, served from the cache when possible.
    pub fn route(&self, origin: NodeId, destination: NodeId, strategy: RouteStrategy) -> SearchResult {
        let key = RouteKey::new(origin, destination, strategy);
        let generation = {
            let mut state = self.state();
            state.total_requests += 1;
            if let Some(cached) = state.cache.get(&key).cloned() {
                state.cache_hits += 1;
                tracing::debug!(origin, destination, ?strategy, "route cache hit");
                return cached;
            }
            state.generation
        };

        let result = match self.select_heuristic(origin, destination, strategy) {
            Some(heuristic) => a_star(&self.graph, origin, destination, heuristic),
            None => shortest_path(&self.graph, origin, destination),
        };
        tracing::debug!(
            origin,
            destination,
            ?strategy,
            algorithm = %result.algorithm,
            explored = result.nodes_explored,
            "route computed"
        );

        let mut state = self.state();
        state.record_computation(&result);
        if state.generation == generation {
            state.cache.insert(key, result.clone());
        }
        result
    }

    /// Convenience wrapper returning only the route distance.
    pub fn distance(&self, origin: NodeId, destination: NodeId, strategy: RouteStrategy) -> f64 {
        self.route(origin, destination, strategy).distance
    }

    /// Uncached A* that sharpens its estimates with every answered query.
    ///
    /// Learned estimates are held in an LRU of
    /// [`DEFAULT_LEARNED_CAPACITY`](crate::astar::DEFAULT_LEARNED_CAPACITY)
    /// entries and dropped on every traffic update.
    pub fn route_adaptive(&self, origin: NodeId, destination: NodeId) -> SearchResult {
        let result = self
            .adaptive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .search(&self.graph, origin, destination);
        let mut state = self.state();
        state.total_requests += 1;
        state.record_computation(&result);
        result
    }

    /// Up to `count` distinct routes, the first being [`Router::route`].
    ///
    /// Each further route comes from a Dijkstra search in which every road
    /// already used is penalised, steering the search towards other
    /// corridors. Reported distances are the true live distances. Fewer than
    /// `count` routes are returned when the network offers no more variety.
    pub fn alternative_routes(
        &self,
        origin: NodeId,
        destination: NodeId,
        strategy: RouteStrategy,
        count: usize,
    ) -> Vec<SearchResult> {
        if count == 0 {
            return Vec::new();
        }
        let primary = self.route(origin, destination, strategy);
        if !primary.found() {
            return Vec::new();
        }

        let mut penalties: HashMap<(NodeId, NodeId), f64> = HashMap::new();
        penalise(&mut penalties, &primary.path);
        let mut routes = vec![primary];

        for _ in 0..count.saturating_mul(4) {
            if routes.len() >= count {
                break;
            }
            let started = Instant::now();
            let candidate = shortest_path_with(
                &self.graph,
                origin,
                destination,
                Algorithm::PenalizedDijkstra,
                |from, edge| {
                    let factor = penalties
                        .get(&road_key(from, edge.target))
                        .copied()
                        .unwrap_or(1.0);
                    self.graph.dynamic_weight(from, edge) * factor
                },
            );
            penalise(&mut penalties, &candidate.path);

            if routes.iter().any(|route| route.path == candidate.path) {
                continue;
            }
            let Some(distance) = self.graph.path_distance(&candidate.path) else {
                continue;
            };
            routes.push(SearchResult {
                distance,
                compute_time_ns: elapsed_ns(started),
                ..candidate
            });
        }

        routes
    }

    /// Apply new traffic multipliers and invalidate every cached route.
    ///
    /// Updates are validated first; an unknown node or an invalid multiplier
    /// rejects the whole batch and leaves the cache intact. This is the one
    /// case where the cache is not cleared: a rejected batch changes no
    /// multiplier, so every cached route is still current. Returns the number
    /// of cached routes dropped.
    pub fn update_traffic(&self, updates: &HashMap<NodeId, f64>) -> Result<usize> {
        let mut state = self.state();
        self.graph.apply_traffic(updates)?;
        let dropped = state.cache.len();
        state.cache.clear();
        state.generation += 1;
        drop(state);

        self.adaptive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
        tracing::info!(
            nodes = updates.len(),
            dropped,
            "traffic conditions updated; route cache cleared"
        );
        Ok(dropped)
    }

    /// Drop every cached route without touching traffic.
    pub fn clear_cache(&self) {
        let mut state = self.state();
        state.cache.clear();
        state.generation += 1;
    }

    pub fn stats(&self) -> RouterStats {
        let state = self.state();
        RouterStats {
            total_requests: state.total_requests,
            cache_hits: state.cache_hits,
            cache_hit_rate: ratio(state.cache_hits as f64, state.total_requests as f64),
            avg_compute_time_ns: ratio(state.compute_time_ns as f64, state.computed as f64),
            cache_size: state.cache.len(),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn road_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    (a.min(b), a.max(b))
}

fn penalise(penalties: &mut HashMap<(NodeId, NodeId), f64>, path: &[NodeId]) {
    for pair in path.windows(2) {
        *penalties.entry(road_key(pair[0], pair[1])).or_insert(1.0) *= ALTERNATIVE_PENALTY;
    }
}
