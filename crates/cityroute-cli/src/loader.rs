//! JSON graph file ingestion.
//!
//! ```json
//! { "nodes": [{"id": 0, "x": 0.0, "y": 0.0, "traffic": 1.0}],
//!   "edges": [{"from": 0, "to": 1, "weight": 1.0, "road_type": "arterial"}] }
//! ```
//!
//! `traffic` defaults to free flow and `road_type` to `street`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use cityroute_lib::{Graph, NodeId, Position, RoadType, FREE_FLOW};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphFile {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default = "free_flow")]
    pub traffic: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeRecord {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    #[serde(default)]
    pub road_type: RoadType,
}

fn free_flow() -> f64 {
    FREE_FLOW
}

impl GraphFile {
    /// Feed the records through the graph builder, which validates ids,
    /// weights and multipliers.
    pub fn into_graph(self) -> cityroute_lib::Result<Graph> {
        let mut builder = Graph::builder();
        for node in self.nodes {
            builder.add_node_with_traffic(node.id, Position::new(node.x, node.y), node.traffic)?;
        }
        for edge in self.edges {
            builder.add_edge(edge.from, edge.to, edge.weight, edge.road_type)?;
        }
        Ok(builder.build())
    }
}

/// Parse a graph document held in memory.
pub fn parse_graph(json: &str) -> Result<Graph> {
    let file: GraphFile = serde_json::from_str(json).context("graph document is malformed")?;
    file.into_graph().context("graph document is invalid")
}

/// Read and parse a graph file.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    let graph = parse_graph(&json)
        .with_context(|| format!("failed to load graph from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        roads = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SQUARE_GRAPH;
    use cityroute_lib::Error;
    use std::io::Write;

    #[test]
    fn parses_defaults_for_optional_fields() {
        let file: GraphFile = serde_json::from_str(SQUARE_GRAPH).unwrap();
        assert_eq!(file.nodes[0].traffic, FREE_FLOW);
        assert_eq!(file.nodes[3].traffic, 1.5);
        assert_eq!(file.edges[1].road_type, RoadType::Street);
        assert_eq!(file.edges[4].road_type, RoadType::Highway);

        let graph = file.into_graph().unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.traffic(3), Some(1.5));
    }

    #[test]
    fn rejects_unknown_road_type() {
        let json = r#"{"nodes": [{"id": 0, "x": 0, "y": 0}, {"id": 1, "x": 1, "y": 0}],
                       "edges": [{"from": 0, "to": 1, "weight": 1.0, "road_type": "canal"}]}"#;
        assert!(parse_graph(json).is_err());
    }

    #[test]
    fn builder_errors_are_preserved_in_the_chain() {
        let json = r#"{"nodes": [{"id": 0, "x": 0, "y": 0}],
                       "edges": [{"from": 0, "to": 9, "weight": 1.0}]}"#;
        let err = parse_graph(json).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::UnknownNode { id: 9 }));
    }

    #[test]
    fn load_graph_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_graph(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));

        let mut good = tempfile::NamedTempFile::new().unwrap();
        good.write_all(SQUARE_GRAPH.as_bytes()).unwrap();
        assert_eq!(load_graph(good.path()).unwrap().node_count(), 5);
    }
}
