use relay_crypto::types::{StdByteArray, STANDARD_ARRAY_LENGTH};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, IfIsHumanReadable};

use crate::primitives::errors::{EncodingError, SchemaError};

/// Number of opaque digests a header proof carries.
pub const PARTS_ARITY: usize = 6;
/// Length of the fixed transport layout.
pub const PARTS_BYTE_LENGTH: usize = PARTS_ARITY * STANDARD_ARRAY_LENGTH;

/// The opaque subtree digests of a header, in tree order.
///
/// Together with the height and app hash leaves these rebuild the block hash:
///
/// ```text
/// root
/// ├── ((version_and_chain_id, (height, time)), last_block_id_and_other)
/// └── ((next_validator_and_consensus, (app_hash, last_results)), evidence_and_proposer)
/// ```
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHeaderMerkleParts {
    // leaves 0..2
    #[serde_as(as = "IfIsHumanReadable<Hex>")]
    pub version_and_chain_id_hash: StdByteArray,
    // leaf 3
    #[serde_as(as = "IfIsHumanReadable<Hex>")]
    pub time_hash: StdByteArray,
    // leaves 4..8
    #[serde_as(as = "IfIsHumanReadable<Hex>")]
    pub last_block_id_and_other: StdByteArray,
    // leaves 8..10
    #[serde_as(as = "IfIsHumanReadable<Hex>")]
    pub next_validator_hash_and_consensus_hash: StdByteArray,
    // leaf 11
    #[serde_as(as = "IfIsHumanReadable<Hex>")]
    pub last_results_hash: StdByteArray,
    // leaves 12..14
    #[serde_as(as = "IfIsHumanReadable<Hex>")]
    pub evidence_and_proposer_hash: StdByteArray,
}

impl BlockHeaderMerkleParts {
    /// Build the bundle from parts in tree order.
    pub fn from_parts(parts: &[StdByteArray]) -> Result<Self, SchemaError> {
        match parts {
            [a, b, c, d, e, f] => Ok(BlockHeaderMerkleParts {
                version_and_chain_id_hash: *a,
                time_hash: *b,
                last_block_id_and_other: *c,
                next_validator_hash_and_consensus_hash: *d,
                last_results_hash: *e,
                evidence_and_proposer_hash: *f,
            }),
            _ => Err(SchemaError::PartsArity {
                expected: PARTS_ARITY,
                actual: parts.len(),
            }),
        }
    }

    /// Parts in tree order.
    pub fn to_array(&self) -> [StdByteArray; PARTS_ARITY] {
        [
            self.version_and_chain_id_hash,
            self.time_hash,
            self.last_block_id_and_other,
            self.next_validator_hash_and_consensus_hash,
            self.last_results_hash,
            self.evidence_and_proposer_hash,
        ]
    }

    /// Fixed layout for contract calls: the six digests concatenated in tree order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_array().concat()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.len() != PARTS_BYTE_LENGTH {
            return Err(EncodingError::InvalidLength {
                expected: PARTS_BYTE_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut parts = [[0u8; STANDARD_ARRAY_LENGTH]; PARTS_ARITY];
        for (part, chunk) in parts.iter_mut().zip(bytes.chunks_exact(STANDARD_ARRAY_LENGTH)) {
            part.copy_from_slice(chunk);
        }
        let [a, b, c, d, e, f] = parts;
        Ok(BlockHeaderMerkleParts {
            version_and_chain_id_hash: a,
            time_hash: b,
            last_block_id_and_other: c,
            next_validator_hash_and_consensus_hash: d,
            last_results_hash: e,
            evidence_and_proposer_hash: f,
        })
    }
}
