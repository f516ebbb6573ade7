//! Structural self-check failures.
//!
//! None of the tree's operations fail at runtime: a missing key is reported as `None`. These
//! errors are only produced by [`AvlTree::check_invariants`](crate::AvlTree::check_invariants) and
//! [`AvlTree::check_balanced`](crate::AvlTree::check_balanced), and always indicate a defect in
//! the tree itself.

use core::fmt;

/// A broken tree invariant. Keys are rendered with their `Debug` impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// The root node has a parent link.
    RootHasParent { root: String, parent: String },
    /// A child's parent link does not point back at the node that holds it.
    ParentMismatch { node: String, expected: String },
    /// An in-order walk found `before` ahead of a smaller key `after`.
    OutOfOrder { before: String, after: String },
    /// A node's cached height disagrees with its children's heights.
    StaleHeight {
        node: String,
        cached: i32,
        actual: i32,
    },
    /// A node's balance factor is outside `-1..=1`.
    Unbalanced { node: String, balance_factor: i32 },
    /// The element count disagrees with the number of linked nodes.
    LenMismatch { len: usize, linked: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::RootHasParent { root, parent } => {
                write!(f, "root {root} has parent {parent}")
            }
            InvariantError::ParentMismatch { node, expected } => {
                write!(f, "parent link of {node} does not point at {expected}")
            }
            InvariantError::OutOfOrder { before, after } => {
                write!(f, "key {before} precedes smaller key {after}")
            }
            InvariantError::StaleHeight {
                node,
                cached,
                actual,
            } => write!(f, "node {node} caches height {cached}, actual height is {actual}"),
            InvariantError::Unbalanced {
                node,
                balance_factor,
            } => write!(f, "node {node} has balance factor {balance_factor}"),
            InvariantError::LenMismatch { len, linked } => {
                write!(f, "tree length is {len} but {linked} nodes are linked")
            }
        }
    }
}

impl std::error::Error for InvariantError {}
