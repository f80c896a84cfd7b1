#![allow(dead_code)]

use std::collections::HashSet;

use cityroute_lib::{Graph, NodeId, Position, RoadType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Four-node diamond: 0-1-3 and 0-2-3, every road weight 1.
pub fn diamond() -> Graph {
    let mut builder = Graph::builder();
    builder.add_node(0, Position::new(0.0, 0.0)).unwrap();
    builder.add_node(1, Position::new(0.5, 0.5)).unwrap();
    builder.add_node(2, Position::new(0.5, -0.5)).unwrap();
    builder.add_node(3, Position::new(1.0, 0.0)).unwrap();
    for (a, b) in [(0, 1), (1, 3), (0, 2), (2, 3)] {
        builder.add_edge(a, b, 1.0, RoadType::Street).unwrap();
    }
    builder.build()
}

/// Unit-weight street grid; node id is `y * width + x`.
pub fn grid(width: i64, height: i64) -> Graph {
    let mut builder = Graph::builder();
    for y in 0..height {
        for x in 0..width {
            builder
                .add_node(y * width + x, Position::new(x as f64, y as f64))
                .unwrap();
        }
    }
    for y in 0..height {
        for x in 0..width {
            let id = y * width + x;
            if x + 1 < width {
                builder.add_edge(id, id + 1, 1.0, RoadType::Street).unwrap();
            }
            if y + 1 < height {
                builder
                    .add_edge(id, id + width, 1.0, RoadType::Arterial)
                    .unwrap();
            }
        }
    }
    builder.build()
}

/// Random connected city with `nodes` intersections and `extra` shortcut
/// roads. Every road costs at least the straight-line distance it spans and
/// multipliers are at least 1, so Euclidean estimates stay admissible.
pub fn random_city(seed: u64, nodes: i64, extra: usize) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let positions: Vec<Position> = (0..nodes)
        .map(|_| Position::new(rng.gen_range(0.0..30.0), rng.gen_range(0.0..30.0)))
        .collect();

    let mut builder = Graph::builder();
    for (id, position) in positions.iter().enumerate() {
        let traffic = rng.gen_range(1.0..2.5);
        builder
            .add_node_with_traffic(id as NodeId, *position, traffic)
            .unwrap();
    }

    let road = |builder: &mut cityroute_lib::GraphBuilder, a: usize, b: usize, rng: &mut StdRng| {
        let weight = positions[a].euclidean_to(&positions[b]) * rng.gen_range(1.0..1.6);
        builder
            .add_edge(a as NodeId, b as NodeId, weight, RoadType::Street)
            .unwrap();
    };

    for id in 1..nodes as usize {
        let previous = rng.gen_range(0..id);
        road(&mut builder, previous, id, &mut rng);
    }
    for _ in 0..extra {
        let a = rng.gen_range(0..nodes as usize);
        let b = rng.gen_range(0..nodes as usize);
        if a != b {
            road(&mut builder, a, b, &mut rng);
        }
    }
    builder.build()
}

/// Minimum live distance over every simple path, by exhaustive search.
pub fn brute_force_distance(graph: &Graph, source: NodeId, target: NodeId) -> f64 {
    fn walk(
        graph: &Graph,
        node: NodeId,
        target: NodeId,
        cost: f64,
        visited: &mut HashSet<NodeId>,
        best: &mut f64,
    ) {
        if node == target {
            *best = best.min(cost);
            return;
        }
        for edge in graph.neighbours(node) {
            if visited.insert(edge.target) {
                let step = graph.dynamic_weight(node, edge);
                walk(graph, edge.target, target, cost + step, visited, best);
                visited.remove(&edge.target);
            }
        }
    }

    if !graph.contains(source) || !graph.contains(target) {
        return f64::INFINITY;
    }
    let mut best = f64::INFINITY;
    let mut visited = HashSet::from([source]);
    walk(graph, source, target, 0.0, &mut visited, &mut best);
    best
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a.is_infinite() && b.is_infinite() && a.signum() == b.signum()) || (a - b).abs() < 1e-9
}
