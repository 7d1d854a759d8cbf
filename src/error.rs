//! Error types shared by every tree in the crate.

use thiserror::Error;

/// Result type alias using [`TreeError`].
pub type Result<T> = core::result::Result<T, TreeError>;

/// Errors reported by tree operations.
///
/// Every error is raised before any mutation becomes visible: a failed
/// `insert` or `delete` leaves the tree exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum TreeError {
    /// A lookup or delete named a key that is not stored in the tree.
    #[error("key not found")]
    KeyNotFound,

    /// An insert named a key that is already stored in the tree.
    #[error("duplicate key")]
    DuplicateKey,

    /// A rank query asked for a position outside `1..=len`.
    #[error("rank {rank} is outside 1..={len}")]
    InvalidRank { rank: usize, len: usize },

    /// A caller passed an argument outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
