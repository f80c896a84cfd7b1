//! Output formatting for command results.
//!
//! Every result renders either as plain text for people or as pretty JSON
//! for scripts. Text formatters return `String` so they can be tested
//! directly.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use cityroute_lib::{Assignment, CoverageStats, NodeId, RouterStats, SearchResult, StationSite};

/// Rendering mode selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Render `value` as JSON, or through `text` for the text format.
    pub fn render<T, F>(self, value: &T, text: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        match self {
            OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
            OutputFormat::Text => Ok(text(value)),
        }
    }
}

/// A single route together with the request that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub origin: NodeId,
    pub destination: NodeId,
    pub route: SearchResult,
    pub stats: RouterStats,
}

/// Alternative routes in order of discovery.
#[derive(Debug, Clone, Serialize)]
pub struct AlternativesReport {
    pub origin: NodeId,
    pub destination: NodeId,
    pub routes: Vec<SearchResult>,
}

/// Full distance matrix; `None` marks unreachable pairs.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    pub nodes: Vec<NodeId>,
    pub distances: Vec<Vec<Option<f64>>>,
}

/// Best station site and the coverage it achieves.
#[derive(Debug, Clone, Serialize)]
pub struct StationReport {
    pub site: Option<StationSite>,
    pub radius: Option<f64>,
    pub coverage: Option<CoverageStats>,
}

/// Assignment pairs with their total.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
    pub assignments: Vec<Assignment<String, String>>,
    pub total_cost: f64,
}

fn distance_label(distance: f64) -> String {
    if distance.is_finite() {
        format!("{distance:.2}")
    } else {
        "unreachable".to_string()
    }
}

fn path_label(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub fn format_route_text(report: &RouteReport) -> String {
    let route = &report.route;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route from {} to {} ({} hops; algorithm: {}):",
        report.origin,
        report.destination,
        route.hop_count(),
        route.algorithm
    );
    for node in &route.path {
        let _ = writeln!(out, "- {node}");
    }
    let _ = writeln!(out, "\nTotal distance: {}", distance_label(route.distance));
    let _ = writeln!(out, "Nodes explored: {}", route.nodes_explored);
    out
}

pub fn format_alternatives_text(report: &AlternativesReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} route(s) from {} to {}:",
        report.routes.len(),
        report.origin,
        report.destination
    );
    for (index, route) in report.routes.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({})",
            index + 1,
            path_label(&route.path),
            distance_label(route.distance)
        );
    }
    out
}

pub fn format_matrix_text(report: &MatrixReport) -> String {
    let cell = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |d| format!("{d:.2}"));
    let width = report
        .distances
        .iter()
        .flatten()
        .map(|value| cell(*value).len())
        .chain(report.nodes.iter().map(|id| id.to_string().len()))
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    let _ = write!(out, "{:>width$}", "");
    for id in &report.nodes {
        let _ = write!(out, " {id:>width$}");
    }
    out.push('\n');
    for (id, row) in report.nodes.iter().zip(&report.distances) {
        let _ = write!(out, "{id:>width$}");
        for value in row {
            let _ = write!(out, " {:>width$}", cell(*value));
        }
        out.push('\n');
    }
    out
}

pub fn format_station_text(report: &StationReport) -> String {
    let mut out = String::new();
    match &report.site {
        Some(site) => {
            let _ = writeln!(out, "Best station site: {}", site.node);
            let _ = writeln!(out, "Worst-case distance: {}", distance_label(site.worst_case));
            let _ = writeln!(out, "Total distance: {}", distance_label(site.total));
        }
        None => {
            let _ = writeln!(out, "No candidate reaches every demand node.");
        }
    }
    if let (Some(radius), Some(coverage)) = (report.radius, &report.coverage) {
        let _ = writeln!(
            out,
            "Coverage within {radius:.2}: {}/{} nodes ({:.1}%), mean nearest {}",
            coverage.covered,
            coverage.total,
            coverage.ratio * 100.0,
            distance_label(coverage.mean_nearest)
        );
    }
    out
}

pub fn format_assignments_text(report: &AssignmentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} assignment(s), total cost {:.2}:",
        report.assignments.len(),
        report.total_cost
    );
    for assignment in &report.assignments {
        let _ = writeln!(
            out,
            "- {} -> {} ({:.2})",
            assignment.agent, assignment.task, assignment.cost
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityroute_lib::Algorithm;

    fn route(path: Vec<NodeId>, distance: f64) -> SearchResult {
        SearchResult {
            path,
            distance,
            algorithm: Algorithm::Dijkstra,
            nodes_explored: 3,
            compute_time_ns: 10,
        }
    }

    #[test]
    fn route_text_lists_each_node() {
        let report = RouteReport {
            origin: 0,
            destination: 2,
            route: route(vec![0, 1, 2], 2.0),
            stats: RouterStats::default(),
        };
        let text = format_route_text(&report);
        assert!(text.starts_with("Route from 0 to 2 (2 hops; algorithm: dijkstra):"));
        assert!(text.contains("- 1\n"));
        assert!(text.contains("Total distance: 2.00"));
    }

    #[test]
    fn json_marks_unreachable_as_null() {
        let report = MatrixReport {
            nodes: vec![0, 1],
            distances: vec![vec![Some(0.0), None], vec![None, Some(0.0)]],
        };
        let json = OutputFormat::Json
            .render(&report, format_matrix_text)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["distances"][0][1].is_null());
        assert_eq!(value["distances"][1][1], 0.0);
    }

    #[test]
    fn matrix_text_aligns_columns() {
        let report = MatrixReport {
            nodes: vec![0, 10],
            distances: vec![vec![Some(0.0), Some(12.5)], vec![Some(12.5), None]],
        };
        let text = format_matrix_text(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.len() == lines[0].len()));
        assert!(lines[2].ends_with('-'));
    }

    #[test]
    fn station_text_without_site_explains_why() {
        let report = StationReport {
            site: None,
            radius: Some(2.0),
            coverage: None,
        };
        assert_eq!(
            format_station_text(&report),
            "No candidate reaches every demand node.\n"
        );
    }

    #[test]
    fn alternatives_text_numbers_routes() {
        let report = AlternativesReport {
            origin: 0,
            destination: 2,
            routes: vec![route(vec![0, 1, 2], 2.0), route(vec![0, 3, 2], 2.5)],
        };
        let text = format_alternatives_text(&report);
        assert!(text.contains("1. 0 -> 1 -> 2 (2.00)"));
        assert!(text.contains("2. 0 -> 3 -> 2 (2.50)"));
    }
}
