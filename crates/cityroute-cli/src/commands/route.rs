//! Route, alternative route and all-pairs command handlers.

use anyhow::{bail, Result};

use cityroute_lib::{all_pairs, NodeId, RouteStrategy, Router};

use super::ensure_nodes;
use crate::output::{
    format_alternatives_text, format_matrix_text, format_route_text, format_station_text,
    AlternativesReport, MatrixReport, OutputFormat, RouteReport, StationReport,
};

/// Arguments for the `route` command.
#[derive(Debug, Clone, Copy)]
pub struct RouteArgs {
    pub from: NodeId,
    pub to: NodeId,
    pub strategy: RouteStrategy,
    /// Use the learning A* instead of the strategy's engine.
    pub adaptive: bool,
}

pub fn handle_route(router: &Router, args: &RouteArgs, format: OutputFormat) -> Result<String> {
    ensure_nodes(router.graph(), &[args.from, args.to])?;
    let route = if args.adaptive {
        router.route_adaptive(args.from, args.to)
    } else {
        router.route(args.from, args.to, args.strategy)
    };
    if !route.found() {
        bail!("no route from {} to {}", args.from, args.to);
    }

    let report = RouteReport {
        origin: args.from,
        destination: args.to,
        route,
        stats: router.stats(),
    };
    format.render(&report, format_route_text)
}

/// Arguments for the `alternatives` command.
#[derive(Debug, Clone, Copy)]
pub struct AlternativesArgs {
    pub from: NodeId,
    pub to: NodeId,
    pub strategy: RouteStrategy,
    pub count: usize,
}

pub fn handle_alternatives(
    router: &Router,
    args: &AlternativesArgs,
    format: OutputFormat,
) -> Result<String> {
    ensure_nodes(router.graph(), &[args.from, args.to])?;
    let routes = router.alternative_routes(args.from, args.to, args.strategy, args.count);
    if routes.is_empty() && args.count > 0 {
        bail!("no route from {} to {}", args.from, args.to);
    }
    let report = AlternativesReport {
        origin: args.from,
        destination: args.to,
        routes,
    };
    format.render(&report, format_alternatives_text)
}

pub fn handle_all_pairs(router: &Router, format: OutputFormat) -> Result<String> {
    let graph = router.graph();
    let matrix = all_pairs(graph);
    let nodes = graph.node_ids().to_vec();
    let distances = nodes
        .iter()
        .map(|&a| {
            nodes
                .iter()
                .map(|&b| Some(matrix.distance(a, b)).filter(|d| d.is_finite()))
                .collect()
        })
        .collect();
    format.render(&MatrixReport { nodes, distances }, format_matrix_text)
}

/// Arguments for the `station` command.
#[derive(Debug, Clone)]
pub struct StationArgs {
    pub candidates: Vec<NodeId>,
    /// Nodes that must be served; every node when empty.
    pub demand: Vec<NodeId>,
    pub radius: Option<f64>,
}

pub fn handle_station(router: &Router, args: &StationArgs, format: OutputFormat) -> Result<String> {
    let graph = router.graph();
    ensure_nodes(graph, &args.candidates)?;
    ensure_nodes(graph, &args.demand)?;
    if let Some(radius) = args.radius {
        if !radius.is_finite() || radius < 0.0 {
            bail!("radius must be a non-negative number");
        }
    }

    let demand = if args.demand.is_empty() {
        graph.node_ids().to_vec()
    } else {
        args.demand.clone()
    };
    let matrix = all_pairs(graph);
    let site = matrix.best_station_site(&args.candidates, &demand);
    let coverage = match (site, args.radius) {
        (Some(site), Some(radius)) => Some(matrix.coverage(&[site.node], radius)),
        _ => None,
    };

    let report = StationReport {
        site,
        radius: args.radius,
        coverage,
    };
    format.render(&report, format_station_text)
}
