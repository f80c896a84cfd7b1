//! Assignment and dispatch command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use cityroute_lib::{
    dispatch_units, solve_assignment, total_cost, CostMatrix, NodeId, RouteStrategy, Router,
};

use super::ensure_nodes;
use crate::output::{format_assignments_text, AssignmentReport, OutputFormat};

/// Cost matrix document for the `assign` command.
///
/// `agents` and `tasks` label rows and columns; when omitted they default to
/// `agent-<row>` and `task-<col>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostFile {
    #[serde(default)]
    pub agents: Option<Vec<String>>,
    #[serde(default)]
    pub tasks: Option<Vec<String>>,
    pub costs: Vec<Vec<f64>>,
}

impl CostFile {
    fn labels(given: Option<Vec<String>>, prefix: &str, count: usize) -> Vec<String> {
        given.unwrap_or_else(|| (0..count).map(|i| format!("{prefix}-{i}")).collect())
    }
}

pub fn assign_from_str(json: &str, format: OutputFormat) -> Result<String> {
    let file: CostFile = serde_json::from_str(json).context("cost document is malformed")?;
    let costs = CostMatrix::from_rows(file.costs).context("cost matrix is invalid")?;
    let agents = CostFile::labels(file.agents, "agent", costs.rows());
    let tasks = CostFile::labels(file.tasks, "task", costs.cols());

    let assignments =
        solve_assignment(&costs, &agents, &tasks).context("labels do not match the cost matrix")?;
    let report = AssignmentReport {
        total_cost: total_cost(&assignments),
        assignments,
    };
    format.render(&report, format_assignments_text)
}

pub fn handle_assign(path: &Path, format: OutputFormat) -> Result<String> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read cost file {}", path.display()))?;
    assign_from_str(&json, format).with_context(|| format!("failed to solve {}", path.display()))
}

/// Arguments for the `dispatch` command.
#[derive(Debug, Clone)]
pub struct DispatchArgs {
    pub units: Vec<(String, NodeId)>,
    pub tasks: Vec<(String, NodeId)>,
    pub strategy: RouteStrategy,
}

pub fn handle_dispatch(router: &Router, args: &DispatchArgs, format: OutputFormat) -> Result<String> {
    let nodes: Vec<NodeId> = args
        .units
        .iter()
        .chain(&args.tasks)
        .map(|(_, node)| *node)
        .collect();
    ensure_nodes(router.graph(), &nodes)?;

    let assignments = dispatch_units(router, &args.units, &args.tasks, args.strategy)
        .context("failed to build dispatch costs")?;
    let report = AssignmentReport {
        total_cost: total_cost(&assignments),
        assignments,
    };
    format.render(&report, format_assignments_text)
}
