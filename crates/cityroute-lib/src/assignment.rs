//! Minimum-cost one-to-one assignment (Hungarian method).
//!
//! Rectangular inputs are squared with dummy rows or columns priced at twice
//! the largest real cost; dummy pairings never reach the caller.
//!
//! Zero tests on the reduced matrix use exact comparison. Reductions of
//! integral or well-scaled costs stay exact, but matrices built from long
//! chains of floating point sums may pick a slightly sub-optimal pairing.

use std::time::Instant;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::path::elapsed_ns;

/// Dense agents × tasks cost matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl CostMatrix {
    /// Build from row vectors. Every row must have the same length and every
    /// cost must be finite and non-negative.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(row_count * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(Error::RaggedCostMatrix {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            for (col, cost) in values.into_iter().enumerate() {
                validate_cost(row, col, cost)?;
                data.push(cost);
            }
        }
        Ok(Self {
            rows: row_count,
            cols,
            data,
        })
    }

    /// Build by evaluating `cost` for every (row, column) pair.
    pub fn from_fn<F>(rows: usize, cols: usize, mut cost: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let value = cost(row, col);
                validate_cost(row, col, value)?;
                data.push(value);
            }
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// Largest entry; zero for an empty matrix.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

fn validate_cost(row: usize, col: usize, cost: f64) -> Result<()> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidCost { row, col, cost })
    }
}

/// One agent paired with one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment<A, T> {
    pub agent: A,
    pub task: T,
    pub cost: f64,
}

/// Sum of the costs of a set of assignments.
pub fn total_cost<A, T>(assignments: &[Assignment<A, T>]) -> f64 {
    assignments.iter().map(|assignment| assignment.cost).sum()
}

/// Solve the assignment problem and map matrix indices to caller ids.
///
/// `agents[i]` labels row `i` and `tasks[j]` labels column `j`. An empty
/// matrix yields an empty list. Id arrays that disagree with the matrix
/// shape are a caller bug and are rejected.
pub fn solve_assignment<A, T>(
    costs: &CostMatrix,
    agents: &[A],
    tasks: &[T],
) -> Result<Vec<Assignment<A, T>>>
where
    A: Clone,
    T: Clone,
{
    if agents.len() != costs.rows() {
        return Err(Error::DimensionMismatch {
            what: "agent ids vs cost matrix rows",
            expected: costs.rows(),
            found: agents.len(),
        });
    }
    if tasks.len() != costs.cols() {
        return Err(Error::DimensionMismatch {
            what: "task ids vs cost matrix columns",
            expected: costs.cols(),
            found: tasks.len(),
        });
    }

    Ok(assign_indices(costs)
        .into_iter()
        .map(|(row, col)| Assignment {
            agent: agents[row].clone(),
            task: tasks[col].clone(),
            cost: costs.data[row * costs.cols + col],
        })
        .collect())
}

/// Optimal (row, column) pairs over the real cells of `costs`, ordered by
/// row. Returns `min(rows, cols)` pairs.
pub fn assign_indices(costs: &CostMatrix) -> Vec<(usize, usize)> {
    if costs.is_empty() {
        return Vec::new();
    }
    let started = Instant::now();
    let n = costs.rows.max(costs.cols);
    let true_max = costs.max();
    let penalty = if true_max > 0.0 { 2.0 * true_max } else { 1.0 };

    let mut reduced = vec![penalty; n * n];
    for row in 0..costs.rows {
        for col in 0..costs.cols {
            reduced[row * n + col] = costs.data[row * costs.cols + col];
        }
    }

    let row_match = solve_square(reduced, n);
    let pairs: Vec<(usize, usize)> = row_match
        .into_iter()
        .enumerate()
        .filter(|&(row, col)| row < costs.rows && col < costs.cols)
        .collect();

    tracing::debug!(
        agents = costs.rows,
        tasks = costs.cols,
        matched = pairs.len(),
        elapsed_ns = elapsed_ns(started),
        "solved assignment"
    );
    pairs
}

/// Solve a square `n × n` problem, returning the column chosen for each row.
fn solve_square(mut matrix: Vec<f64>, n: usize) -> Vec<usize> {
    for row in 0..n {
        let min = matrix[row * n..(row + 1) * n]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        for value in &mut matrix[row * n..(row + 1) * n] {
            *value -= min;
        }
    }
    for col in 0..n {
        let min = (0..n)
            .map(|row| matrix[row * n + col])
            .fold(f64::INFINITY, f64::min);
        for row in 0..n {
            matrix[row * n + col] -= min;
        }
    }

    let mut matcher = ZeroMatcher::new(matrix, n);
    matcher.greedy();
    for row in 0..n {
        while matcher.row_match[row].is_none() {
            matcher.reset_visits();
            if matcher.augment(row) {
                break;
            }
            matcher.adjust();
        }
    }

    matcher
        .row_match
        .into_iter()
        .map(|col| col.unwrap_or_default())
        .collect()
}

/// Matching over the zero cells of a reduced square matrix.
struct ZeroMatcher {
    matrix: Vec<f64>,
    n: usize,
    row_match: Vec<Option<usize>>,
    col_match: Vec<Option<usize>>,
    visited_rows: Vec<bool>,
    visited_cols: Vec<bool>,
}

impl ZeroMatcher {
    fn new(matrix: Vec<f64>, n: usize) -> Self {
        Self {
            matrix,
            n,
            row_match: vec![None; n],
            col_match: vec![None; n],
            visited_rows: vec![false; n],
            visited_cols: vec![false; n],
        }
    }

    fn is_zero(&self, row: usize, col: usize) -> bool {
        self.matrix[row * self.n + col] == 0.0
    }

    /// Initial matching: each row takes its first free zero column.
    fn greedy(&mut self) {
        for row in 0..self.n {
            if let Some(col) =
                (0..self.n).find(|&col| self.is_zero(row, col) && self.col_match[col].is_none())
            {
                self.row_match[row] = Some(col);
                self.col_match[col] = Some(row);
            }
        }
    }

    fn reset_visits(&mut self) {
        self.visited_rows.fill(false);
        self.visited_cols.fill(false);
    }

    /// Kuhn augmenting path search through zero cells. Recursion depth is
    /// bounded by `n`.
    fn augment(&mut self, row: usize) -> bool {
        self.visited_rows[row] = true;
        for col in 0..self.n {
            if self.visited_cols[col] || !self.is_zero(row, col) {
                continue;
            }
            self.visited_cols[col] = true;
            let free = match self.col_match[col] {
                None => true,
                Some(owner) => self.augment(owner),
            };
            if free {
                self.row_match[row] = Some(col);
                self.col_match[col] = Some(row);
                return true;
            }
        }
        false
    }

    /// No augmenting path: shift the smallest cost reachable from the
    /// visited rows into a new zero while keeping every matched cell at zero.
    fn adjust(&mut self) {
        let n = self.n;
        let mut delta = f64::INFINITY;
        for row in (0..n).filter(|&row| self.visited_rows[row]) {
            for col in (0..n).filter(|&col| !self.visited_cols[col]) {
                delta = delta.min(self.matrix[row * n + col]);
            }
        }
        if !delta.is_finite() {
            return;
        }
        for row in 0..n {
            for col in 0..n {
                match (self.visited_rows[row], self.visited_cols[col]) {
                    (true, false) => self.matrix[row * n + col] -= delta,
                    (false, true) => self.matrix[row * n + col] += delta,
                    _ => {}
                }
            }
        }
    }
}
