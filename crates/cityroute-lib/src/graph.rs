use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric identifier for an intersection in the city graph.
pub type NodeId = i64;

/// Default traffic multiplier for free-flowing nodes.
pub const FREE_FLOW: f64 = 1.0;

/// Planar coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position.
    pub fn euclidean_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Grid (L1) distance to another position.
    pub fn manhattan_to(&self, other: &Self) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Descriptive classification of a road segment. Not used for costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    #[default]
    Street,
    Arterial,
    Highway,
    Bridge,
}

/// Directed half of an undirected road.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub base_weight: f64,
    pub road_type: RoadType,
}

/// Traffic multiplier stored as raw `f64` bits so single reads and writes are
/// atomic without a lock.
struct TrafficMultiplier(AtomicU64);

impl TrafficMultiplier {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

impl fmt::Debug for TrafficMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Intersection with its outgoing road records.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    position: Position,
    traffic: TrafficMultiplier,
    edges: Vec<Edge>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Current traffic multiplier applied to roads leaving this node.
    pub fn traffic(&self) -> f64 {
        self.traffic.get()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Weighted, undirected city graph with live per-node traffic multipliers.
///
/// Topology is fixed once built. Only the multipliers change, and only
/// through the router's traffic update entry point.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    ids: Vec<NodeId>,
    road_count: usize,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(&id).map(|node| node.position)
    }

    /// Current traffic multiplier of a node.
    pub fn traffic(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(Node::traffic)
    }

    /// Return the outgoing edges for a node; unknown nodes have none.
    pub fn neighbours(&self, id: NodeId) -> &[Edge] {
        self.nodes
            .get(&id)
            .map(|node| node.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Node identifiers in ascending order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of undirected roads (each stored as two directed records).
    pub fn edge_count(&self) -> usize {
        self.road_count
    }

    /// Live cost of traversing `edge` out of `from`: the base weight scaled by
    /// the source node's multiplier at the moment of the call.
    pub fn dynamic_weight(&self, from: NodeId, edge: &Edge) -> f64 {
        let multiplier = self.traffic(from).unwrap_or(FREE_FLOW);
        edge.base_weight * multiplier
    }

    /// Cheapest live cost of a direct road from `from` to `to`, if any.
    pub fn direct_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.neighbours(from)
            .iter()
            .filter(|edge| edge.target == to)
            .map(|edge| self.dynamic_weight(from, edge))
            .min_by(f64::total_cmp)
    }

    /// Straight-line distance between two nodes.
    pub fn straight_line(&self, a: NodeId, b: NodeId) -> Option<f64> {
        Some(self.position(a)?.euclidean_to(&self.position(b)?))
    }

    /// Sum of live weights along `path`. `None` when a hop is not a road or
    /// the path is empty.
    pub fn path_distance(&self, path: &[NodeId]) -> Option<f64> {
        match path {
            [] => None,
            [only] => self.contains(*only).then_some(0.0),
            _ => path
                .windows(2)
                .map(|pair| self.direct_weight(pair[0], pair[1]))
                .sum(),
        }
    }

    /// Validate every update, then store them all. Returns the number of
    /// multipliers written. Nothing is written when any entry is invalid.
    pub(crate) fn apply_traffic(&self, updates: &HashMap<NodeId, f64>) -> Result<usize> {
        for (&id, &multiplier) in updates {
            if !self.contains(id) {
                return Err(Error::UnknownNode { id });
            }
            validate_multiplier(id, multiplier)?;
        }
        for (id, multiplier) in updates {
            if let Some(node) = self.nodes.get(id) {
                node.traffic.set(*multiplier);
            }
        }
        Ok(updates.len())
    }
}

/// Incremental graph construction used by map loaders.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: HashMap<NodeId, Node>,
    road_count: usize,
}

impl GraphBuilder {
    /// Declare a node with free-flowing traffic.
    pub fn add_node(&mut self, id: NodeId, position: Position) -> Result<&mut Self> {
        self.add_node_with_traffic(id, position, FREE_FLOW)
    }

    pub fn add_node_with_traffic(
        &mut self,
        id: NodeId,
        position: Position,
        traffic: f64,
    ) -> Result<&mut Self> {
        validate_multiplier(id, traffic)?;
        if self.nodes.contains_key(&id) {
            return Err(Error::DuplicateNode { id });
        }
        self.nodes.insert(
            id,
            Node {
                id,
                position,
                traffic: TrafficMultiplier::new(traffic),
                edges: Vec::new(),
            },
        );
        Ok(self)
    }

    /// Add an undirected road; both directed halves are written together.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: f64,
        road_type: RoadType,
    ) -> Result<&mut Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight { from, to, weight });
        }
        for id in [from, to] {
            if !self.nodes.contains_key(&id) {
                return Err(Error::UnknownNode { id });
            }
        }

        let halves = if from == to {
            vec![(from, to)]
        } else {
            vec![(from, to), (to, from)]
        };
        for (source, target) in halves {
            if let Some(node) = self.nodes.get_mut(&source) {
                node.edges.push(Edge {
                    target,
                    base_weight: weight,
                    road_type,
                });
            }
        }
        self.road_count += 1;
        Ok(self)
    }

    pub fn build(self) -> Graph {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        Graph {
            nodes: self.nodes,
            ids,
            road_count: self.road_count,
        }
    }
}

fn validate_multiplier(id: NodeId, multiplier: f64) -> Result<()> {
    if multiplier.is_finite() && multiplier >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidMultiplier { id, multiplier })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> GraphBuilder {
        let mut builder = Graph::builder();
        builder.add_node(1, Position::new(0.0, 0.0)).unwrap();
        builder.add_node(2, Position::new(3.0, 4.0)).unwrap();
        builder
    }

    #[test]
    fn add_edge_stores_both_directions() {
        let mut builder = two_nodes();
        builder.add_edge(1, 2, 5.0, RoadType::Arterial).unwrap();
        let graph = builder.build();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbours(1)[0].target, 2);
        assert_eq!(graph.neighbours(2)[0].target, 1);
        assert_eq!(graph.neighbours(2)[0].road_type, RoadType::Arterial);
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut builder = two_nodes();
        let error = builder.add_node(1, Position::default()).unwrap_err();
        assert_eq!(error, Error::DuplicateNode { id: 1 });
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut builder = two_nodes();
        assert!(matches!(
            builder.add_edge(1, 2, -1.0, RoadType::Street),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(matches!(
            builder.add_edge(1, 3, 1.0, RoadType::Street),
            Err(Error::UnknownNode { id: 3 })
        ));
    }

    #[test]
    fn dynamic_weight_uses_source_multiplier() {
        let mut builder = Graph::builder();
        builder
            .add_node_with_traffic(1, Position::default(), 2.0)
            .unwrap();
        builder.add_node(2, Position::default()).unwrap();
        builder.add_edge(1, 2, 3.0, RoadType::Street).unwrap();
        let graph = builder.build();

        assert_eq!(graph.direct_weight(1, 2), Some(6.0));
        assert_eq!(graph.direct_weight(2, 1), Some(3.0));
    }

    #[test]
    fn apply_traffic_is_all_or_nothing() {
        let mut builder = two_nodes();
        builder.add_edge(1, 2, 1.0, RoadType::Street).unwrap();
        let graph = builder.build();

        let updates = HashMap::from([(1, 4.0), (2, -1.0)]);
        assert!(graph.apply_traffic(&updates).is_err());
        assert_eq!(graph.traffic(1), Some(FREE_FLOW));

        let updates = HashMap::from([(1, 4.0)]);
        assert_eq!(graph.apply_traffic(&updates), Ok(1));
        assert_eq!(graph.traffic(1), Some(4.0));
    }

    #[test]
    fn path_distance_sums_live_weights() {
        let mut builder = two_nodes();
        builder.add_edge(1, 2, 5.0, RoadType::Street).unwrap();
        let graph = builder.build();

        assert_eq!(graph.path_distance(&[1, 2, 1]), Some(10.0));
        assert_eq!(graph.path_distance(&[2]), Some(0.0));
        assert_eq!(graph.path_distance(&[]), None);
        assert_eq!(graph.straight_line(1, 2), Some(5.0));
    }
}
