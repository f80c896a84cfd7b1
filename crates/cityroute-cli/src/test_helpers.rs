// Test utilities used across `cityroute-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use cityroute_lib::{Graph, Router, RouterConfig};
use std::sync::Arc;

use crate::loader::parse_graph;

/// Five intersections: a square 0-1-2-3 with a slow diagonal and a spur to 4.
pub const SQUARE_GRAPH: &str = r#"{
    "nodes": [
        {"id": 0, "x": 0.0, "y": 0.0},
        {"id": 1, "x": 1.0, "y": 0.0},
        {"id": 2, "x": 1.0, "y": 1.0},
        {"id": 3, "x": 0.0, "y": 1.0, "traffic": 1.5},
        {"id": 4, "x": 2.0, "y": 1.0}
    ],
    "edges": [
        {"from": 0, "to": 1, "weight": 1.0, "road_type": "arterial"},
        {"from": 1, "to": 2, "weight": 1.0},
        {"from": 2, "to": 3, "weight": 1.0},
        {"from": 3, "to": 0, "weight": 1.0},
        {"from": 0, "to": 2, "weight": 3.0, "road_type": "highway"},
        {"from": 2, "to": 4, "weight": 1.0, "road_type": "bridge"}
    ]
}"#;

pub fn square_graph() -> Graph {
    parse_graph(SQUARE_GRAPH).expect("fixture graph parses")
}

pub fn square_router() -> Router {
    Router::new(Arc::new(square_graph()), RouterConfig::default()).expect("default config")
}
