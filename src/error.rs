//! Error types reported by graph construction and by the solvers.
//!
//! Unreachability is never an error: path queries report it as an empty result.

use thiserror::Error;

use crate::Node;

/// Errors raised while building a [`Graph`](crate::repr::Graph).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A link references a node index that does not exist
    #[error("link ({from}, {to}) references node {index}, but the graph only has {len} nodes")]
    NodeOutOfRange {
        from: Node,
        to: Node,
        index: Node,
        len: usize,
    },

    /// More nodes than can be addressed by [`Node`]
    #[error("cannot address {0} nodes")]
    TooManyNodes(usize),
}

/// Returned by the topological sorter if the graph contains a directed cycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("graph contains a cycle; {unordered} nodes could not be ordered")]
pub struct CycleDetected {
    /// Number of nodes that remained with a positive in-degree
    pub unordered: usize,
}

/// Reasons why coloring stopped early. Already assigned colors are left in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColoringError {
    /// The palette has no colors but the graph has nodes
    #[error("cannot color a non-empty graph with an empty palette")]
    EmptyPalette,

    /// Every palette color is already used by a neighbor of `node`
    #[error("impossible to color node {node}")]
    Uncolorable { node: Node },

    /// Two-coloring found adjacent nodes forced onto the same color
    #[error("impossible to color: {u} and {v} have the same color")]
    Conflict { u: Node, v: Node },
}
