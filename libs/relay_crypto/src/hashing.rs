//! Hashing trait and the default SHA-256 implementation.
//!
//! The `HashFunction` trait exposes a minimal update/finalize API so that the
//! tree code stays independent of the concrete digest and tests can swap it.

use sha2::{Digest, Sha256};

use crate::types::StdByteArray;

/// A trait for hash functions that support updating with data and producing a digest.
pub trait HashFunction {
    /// Updates the hash function with the given data.
    ///
    /// # Arguments
    ///
    /// * `data` - The data to be hashed.
    fn update(&mut self, data: impl AsRef<[u8]>);

    /// Finalizes the hash computation, returns the digest and resets the
    /// internal state so the instance can be reused for the next node.
    fn digest(&mut self) -> StdByteArray;
}

/// SHA-256, the digest used by the consensus engine for header hashing.
#[derive(Clone, Default)]
pub struct DefaultHash {
    hasher: Sha256,
}

impl DefaultHash {
    /// Creates a new instance of the SHA-256 hash function.
    pub fn new() -> Self {
        DefaultHash {
            hasher: Sha256::new(),
        }
    }
}

impl HashFunction for DefaultHash {
    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.hasher.update(data);
    }

    fn digest(&mut self) -> StdByteArray {
        self.hasher.finalize_reset().into()
    }
}
