use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the cityroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Routing queries never produce these: an unknown node or a disconnected
/// pair yields an empty path instead. Errors are reserved for malformed
/// input handed to the library at its boundaries.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Raised when the graph builder receives the same node identifier twice.
    #[error("node {id} was declared more than once")]
    DuplicateNode { id: NodeId },

    /// Raised when an edge or traffic update references an undeclared node.
    #[error("unknown node {id}")]
    UnknownNode { id: NodeId },

    /// Raised when an edge weight is negative or not finite.
    #[error("invalid weight {weight} on edge {from} -> {to}; weights must be finite and non-negative")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    /// Raised when a traffic multiplier is negative or not finite.
    #[error("invalid traffic multiplier {multiplier} for node {id}")]
    InvalidMultiplier { id: NodeId, multiplier: f64 },

    /// Raised when a cost matrix entry is negative or not finite.
    #[error("invalid cost {cost} at row {row}, column {col}")]
    InvalidCost { row: usize, col: usize, cost: f64 },

    /// Raised when cost matrix rows have different lengths.
    #[error("cost matrix row {row} has {found} columns, expected {expected}")]
    RaggedCostMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Raised when identifier arrays disagree with the cost matrix shape.
    #[error("{what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Raised when router configuration values are out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
