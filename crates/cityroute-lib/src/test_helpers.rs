// Test-only graph fixtures for `cityroute-lib` unit tests
#![allow(dead_code)]

use crate::graph::{Graph, Position, RoadType};

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

/// Straight road of `len` nodes spaced one unit apart.
pub fn line(len: i64) -> Graph {
    let mut builder = Graph::builder();
    for id in 0..len {
        builder.add_node(id, Position::new(id as f64, 0.0)).unwrap();
    }
    for id in 1..len {
        builder.add_edge(id - 1, id, 1.0, RoadType::Street).unwrap();
    }
    builder.build()
}

/// `width` x `height` street grid with unit weights. Node id is
/// `y * width + x`.
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
                    .add_edge(id, id + width, 1.0, RoadType::Street)
                    .unwrap();
            }
        }
    }
    builder.build()
}
