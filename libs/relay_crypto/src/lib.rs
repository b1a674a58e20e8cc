//! Hash-tree primitives behind block header relay proofs.
//!
//! This crate provides small, focused building blocks:
//! - A hashing trait and the default SHA-256 hasher
//! - Domain-separated leaf/branch hashing and the unpadded recursive tree shape
//! - Selective disclosure: splitting a tree into public leaves and opaque parts,
//!   and rebuilding the root from them on the verifier side
//!
//! None of the public APIs in this crate perform network or filesystem I/O.

/// Hashing trait and the default SHA-256 hasher.
pub mod hashing;
/// Leaf/branch hashing, split rule and range hashing.
pub mod merkle;
/// Disclosure plans, part extraction and root reconstruction.
pub mod disclosure;
/// Error type shared by tree and disclosure operations.
pub mod errors;
/// Common type aliases and constants used by this crate.
pub mod types;
