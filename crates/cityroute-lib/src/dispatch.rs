//! Unit-to-task dispatch built on routing distances.
//!
//! Each unit travels from its node to the task's node; the route distance is
//! the pairing cost. Unreachable pairs are priced above any complete set of
//! reachable pairings so the solver only uses them when it must, and they are
//! dropped from the result.

use std::collections::HashSet;

use crate::assignment::{assign_indices, Assignment, CostMatrix};
use crate::error::Result;
use crate::graph::NodeId;
use crate::router::{RouteStrategy, Router};

/// Cost matrix derived from routing, with the cells no route could serve.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingCosts {
    pub matrix: CostMatrix,
    pub unreachable: HashSet<(usize, usize)>,
}

/// Build a cost matrix from an arbitrary distance function, such as a
/// straight-line estimate.
pub fn cost_matrix_from_fn<U, T, F>(units: &[U], tasks: &[T], mut distance: F) -> Result<CostMatrix>
where
    F: FnMut(&U, &T) -> f64,
{
    CostMatrix::from_fn(units.len(), tasks.len(), |row, col| {
        distance(&units[row], &tasks[col])
    })
}

/// Query the router for every unit × task pair.
pub fn build_cost_matrix(
    router: &Router,
    units: &[NodeId],
    tasks: &[NodeId],
    strategy: RouteStrategy,
) -> Result<RoutingCosts> {
    let distances: Vec<Vec<f64>> = units
        .iter()
        .map(|&unit| {
            tasks
                .iter()
                .map(|&task| router.distance(unit, task, strategy))
                .collect()
        })
        .collect();

    let largest = distances
        .iter()
        .flatten()
        .copied()
        .filter(|distance| distance.is_finite())
        .fold(0.0, f64::max);
    let size = units.len().max(tasks.len());
    let unreachable_cost = largest.max(1.0) * (size as f64 + 1.0);

    let mut unreachable = HashSet::new();
    let matrix = CostMatrix::from_fn(units.len(), tasks.len(), |row, col| {
        let distance = distances[row][col];
        if distance.is_finite() {
            distance
        } else {
            unreachable.insert((row, col));
            unreachable_cost
        }
    })?;

    Ok(RoutingCosts {
        matrix,
        unreachable,
    })
}

/// Assign units to tasks minimising total travel distance.
///
/// `units` and `tasks` pair a caller id with the node where the unit waits
/// or the task occurs. Units that could only reach their task through a
/// missing route are left unassigned.
pub fn dispatch_units<U, T>(
    router: &Router,
    units: &[(U, NodeId)],
    tasks: &[(T, NodeId)],
    strategy: RouteStrategy,
) -> Result<Vec<Assignment<U, T>>>
where
    U: Clone,
    T: Clone,
{
    let unit_nodes: Vec<NodeId> = units.iter().map(|(_, node)| *node).collect();
    let task_nodes: Vec<NodeId> = tasks.iter().map(|(_, node)| *node).collect();
    let costs = build_cost_matrix(router, &unit_nodes, &task_nodes, strategy)?;

    let mut assignments = Vec::new();
    for (row, col) in assign_indices(&costs.matrix) {
        if costs.unreachable.contains(&(row, col)) {
            tracing::warn!(
                unit_node = unit_nodes[row],
                task_node = task_nodes[col],
                "no route between unit and task; leaving pair unassigned"
            );
            continue;
        }
        assignments.push(Assignment {
            agent: units[row].0.clone(),
            task: tasks[col].0.clone(),
            cost: costs.matrix.get(row, col).unwrap_or(f64::INFINITY),
        });
    }
    Ok(assignments)
}
