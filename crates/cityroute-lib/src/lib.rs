//! cityroute library entry points.
//!
//! This crate holds the traffic-aware city graph, the shortest path engines
//! (Dijkstra, A*, Floyd–Warshall), the cached routing facade and the
//! Hungarian assignment solver used to dispatch units to tasks. Map loading,
//! presentation and orchestration live with the callers; they should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod assignment;
pub mod astar;
pub mod cache;
pub mod dijkstra;
pub mod dispatch;
pub mod error;
pub mod floyd_warshall;
pub mod graph;
pub mod path;
pub mod queue;
pub mod router;

#[cfg(test)]
mod test_helpers;

pub use assignment::{solve_assignment, total_cost, Assignment, CostMatrix};
pub use astar::{a_star, AdaptiveAStar, Heuristic, DEFAULT_LEARNED_CAPACITY};
pub use cache::{RouteCache, RouteKey, DEFAULT_CACHE_CAPACITY};
pub use dijkstra::{shortest_path, shortest_paths, ShortestPathTree};
pub use dispatch::{build_cost_matrix, cost_matrix_from_fn, dispatch_units, RoutingCosts};
pub use error::{Error, Result};
pub use floyd_warshall::{all_pairs, AllPairs, CoverageStats, StationSite};
pub use graph::{Edge, Graph, GraphBuilder, Node, NodeId, Position, RoadType, FREE_FLOW};
pub use path::{Algorithm, SearchResult};
pub use queue::IndexedMinQueue;
pub use router::{RouteStrategy, Router, RouterConfig, RouterStats, DEFAULT_ASTAR_THRESHOLD};
