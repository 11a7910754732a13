//! Structural errors reported by [`BsTree::verify`](crate::BsTree::verify).

use thiserror::Error;

/// A broken tree invariant.
///
/// None of these can be produced through the public API; they exist so that
/// tests and debug builds can check the tree after every mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// An in-order neighbour pair is not strictly increasing.
    #[error("keys out of order at in-order position {position}")]
    OrderViolation { position: usize },

    /// A child does not point back at the node that owns it.
    #[error("child at depth {depth} does not link back to its parent")]
    ParentLinkMismatch { depth: usize },

    #[error("root node has a parent link")]
    RootHasParent,

    #[error("recorded size {recorded} but {counted} nodes are reachable")]
    SizeMismatch { recorded: usize, counted: usize },
}

pub type Result<T> = std::result::Result<T, InvariantError>;
