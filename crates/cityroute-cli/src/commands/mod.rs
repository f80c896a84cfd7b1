//! Command handlers.
//!
//! Each module handles a group of subcommands. `main.rs` parses arguments,
//! loads the graph and forwards to these handlers, which return the rendered
//! output.

pub mod assign;
pub mod route;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;

use cityroute_lib::{Graph, NodeId, RouteStrategy, Router, RouterConfig};

/// Command-line spelling of [`RouteStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyArg {
    Fastest,
    Shortest,
    #[default]
    Balanced,
}

impl From<StrategyArg> for RouteStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Fastest => RouteStrategy::Fastest,
            StrategyArg::Shortest => RouteStrategy::Shortest,
            StrategyArg::Balanced => RouteStrategy::Balanced,
        }
    }
}

/// Parse a `NODE=MULTIPLIER` traffic override.
pub fn parse_traffic(raw: &str) -> Result<(NodeId, f64), String> {
    let (node, multiplier) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NODE=MULTIPLIER, got '{raw}'"))?;
    let node = node
        .trim()
        .parse::<NodeId>()
        .map_err(|err| format!("invalid node id '{node}': {err}"))?;
    let multiplier = multiplier
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid multiplier '{multiplier}': {err}"))?;
    Ok((node, multiplier))
}

/// Parse a `NAME=NODE` unit or task placement.
pub fn parse_placement(raw: &str) -> Result<(String, NodeId), String> {
    let (name, node) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=NODE, got '{raw}'"))?;
    if name.trim().is_empty() {
        return Err(format!("missing name in '{raw}'"));
    }
    let node = node
        .trim()
        .parse::<NodeId>()
        .map_err(|err| format!("invalid node id '{node}': {err}"))?;
    Ok((name.trim().to_string(), node))
}

/// Wrap `graph` in a router and apply any traffic overrides.
pub fn build_router(graph: Graph, config: RouterConfig, traffic: &[(NodeId, f64)]) -> Result<Router> {
    let router = Router::new(Arc::new(graph), config).context("invalid router configuration")?;
    if !traffic.is_empty() {
        let updates: HashMap<NodeId, f64> = traffic.iter().copied().collect();
        router
            .update_traffic(&updates)
            .context("failed to apply traffic overrides")?;
    }
    Ok(router)
}

/// Reject node ids that are not part of the loaded graph.
pub fn ensure_nodes(graph: &Graph, ids: &[NodeId]) -> Result<()> {
    for &id in ids {
        if !graph.contains(id) {
            bail!("unknown node {id}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::square_graph;

    #[test]
    fn traffic_and_placement_parsers() {
        assert_eq!(parse_traffic("3=1.5"), Ok((3, 1.5)));
        assert_eq!(parse_traffic(" -2 = 2 "), Ok((-2, 2.0)));
        assert!(parse_traffic("3").is_err());
        assert!(parse_traffic("x=1").is_err());

        assert_eq!(parse_placement("ambulance=4"), Ok(("ambulance".to_string(), 4)));
        assert!(parse_placement("=4").is_err());
        assert!(parse_placement("ambulance=four").is_err());
    }

    #[test]
    fn build_router_applies_overrides() {
        let router = build_router(square_graph(), RouterConfig::default(), &[(1, 3.0)]).unwrap();
        assert_eq!(router.graph().traffic(1), Some(3.0));

        let err = build_router(square_graph(), RouterConfig::default(), &[(42, 3.0)]).unwrap_err();
        assert!(format!("{err:#}").contains("traffic"));
    }

    #[test]
    fn ensure_nodes_names_the_missing_id() {
        let graph = square_graph();
        assert!(ensure_nodes(&graph, &[0, 4]).is_ok());
        let err = ensure_nodes(&graph, &[0, 7]).unwrap_err();
        assert_eq!(err.to_string(), "unknown node 7");
    }
}
