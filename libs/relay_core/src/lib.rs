//! Selective-disclosure proofs of block header hashes.
//!
//! A relayer turns a decoded header into six opaque digests; a verifier that
//! trusts a block hash checks a claimed height and app hash against it by
//! rebuilding the header's hash tree from those digests.

pub mod primitives;
pub mod protocol;
