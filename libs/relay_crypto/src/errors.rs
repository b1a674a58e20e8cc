//! Error types for tree construction and selective disclosure.

use thiserror::Error;

/// Errors that can occur while building, disclosing or reconstructing a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf
    #[error("cannot build a Merkle tree over zero leaves")]
    EmptyTree,

    /// The requested leaf range is empty or runs past the last leaf
    #[error("leaf range {start}..{end} is empty or outside a tree of {len} leaves")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Disclosure plans are bounded by the width of their position mask
    #[error("disclosure plan supports at most {max} leaves, got {actual}")]
    TooManyLeaves { max: usize, actual: usize },

    /// A public position does not exist in the plan
    #[error("public position {position} is outside a plan of {len} leaves")]
    PositionOutOfRange { position: usize, len: usize },

    /// The plan and the tree disagree on the leaf count
    #[error("disclosure plan covers {plan} leaves but the tree has {tree}")]
    PlanSizeMismatch { plan: usize, tree: usize },

    /// The verifier supplied the wrong number of public leaf hashes
    #[error("expected {expected} public leaf hashes, got {actual}")]
    PublicLeafCountMismatch { expected: usize, actual: usize },

    /// The prover supplied the wrong number of opaque parts
    #[error("expected {expected} opaque parts, got {actual}")]
    PartsCountMismatch { expected: usize, actual: usize },
}
