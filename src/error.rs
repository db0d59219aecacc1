//! Error types.

use thiserror::Error;

/// Failure of a positional operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListError {
    /// A 0-based index outside the valid range for the operation.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A 1-based rank outside `1..=len`.
    #[error("rank {rank} out of range 1..={len}")]
    RankOutOfRange { rank: usize, len: usize },
}

/// A structural invariant that does not hold. Reported by
/// [`BalancedList::verify`](crate::BalancedList::verify).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("node at position {position} has balance factor {balance}")]
    Unbalanced { position: usize, balance: i32 },
    #[error("node at position {position} stores rank {stored}, children imply {expected}")]
    Rank {
        position: usize,
        stored: usize,
        expected: usize,
    },
    #[error("node at position {position} stores height {stored}, children imply {expected}")]
    Height {
        position: usize,
        stored: i32,
        expected: i32,
    },
    #[error("node at position {position} has a stale parent link")]
    Parent { position: usize },
    #[error("root node has a parent")]
    RootParent,
    #[error("cached {which} node does not match the in-order {which} element")]
    Boundary { which: &'static str },
}
