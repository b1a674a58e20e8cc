//! Prover and verifier entry points for header relay proofs.
//!
//! The prover walks a full header and ships the opaque parts. The verifier
//! holds only the height and app hash, re-hashes those two leaves itself and
//! rebuilds the block hash from the parts.

use relay_crypto::{
    disclosure::{extract_parts, reconstruct_root, Visibility},
    hashing::{DefaultHash, HashFunction},
    merkle::leaf_hash,
    types::StdByteArray,
};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, IfIsHumanReadable};
use tracing::instrument;

use crate::{
    primitives::{
        errors::{HeaderError, SchemaError},
        header::BlockHeader,
        parts::BlockHeaderMerkleParts,
    },
    protocol::{
        encoding::CanonicalEncode,
        schema::{FieldValue, HeaderField, HeaderSchema},
    },
};

/// The raw values a verifier already trusts or can recompute.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicValues {
    pub height: i64,
    #[serde_as(as = "Option<IfIsHumanReadable<Hex>>")]
    pub app_hash: Option<Vec<u8>>,
}

impl PublicValues {
    pub fn new(height: i64, app_hash: impl Into<Vec<u8>>) -> Self {
        PublicValues {
            height,
            app_hash: Some(app_hash.into()),
        }
    }

    pub fn value_of(&self, field: HeaderField) -> Option<FieldValue> {
        match field {
            HeaderField::Height => Some(FieldValue::Integer(self.height)),
            HeaderField::AppHash => Some(FieldValue::Bytes(self.app_hash.clone())),
            _ => None,
        }
    }
}

impl From<&BlockHeader> for PublicValues {
    fn from(header: &BlockHeader) -> Self {
        PublicValues {
            height: header.height,
            app_hash: header.app_hash.clone(),
        }
    }
}

/// Outcome of checking a proof against a trusted block hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Accepted,
    Rejected {
        expected: StdByteArray,
        computed: StdByteArray,
    },
}

impl VerificationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerificationResult::Accepted)
    }
}

/// Compute the opaque parts of `header` under `schema`.
#[instrument(skip_all, fields(height = header.height, schema = ?schema.version))]
pub fn get_block_header_merkle_parts(
    header: &BlockHeader,
    schema: &HeaderSchema,
) -> Result<BlockHeaderMerkleParts, HeaderError> {
    let mut hasher = DefaultHash::new();
    let tree = header.merkle_tree(schema)?;
    let plan = schema.disclosure_plan()?;
    let parts = extract_parts(&tree, &plan, &mut hasher)?;
    tracing::debug!("Extracted {} parts from {} leaves", parts.len(), tree.len());
    Ok(BlockHeaderMerkleParts::from_parts(&parts)?)
}

/// Leaf digests of the public fields, in schema order.
pub fn public_leaf_hashes(
    public: &PublicValues,
    schema: &HeaderSchema,
    hasher: &mut impl HashFunction,
) -> Result<Vec<StdByteArray>, HeaderError> {
    let mut leaves = Vec::new();
    for (position, descriptor) in schema.fields.iter().enumerate() {
        if descriptor.visibility != Visibility::Public {
            continue;
        }
        let value = public
            .value_of(descriptor.field)
            .ok_or(SchemaError::MissingPublicValue(descriptor.field.name()))?;
        schema.check_value(position, &value)?;
        leaves.push(leaf_hash(value.encode_canonical()?, hasher));
    }
    Ok(leaves)
}

/// Rebuild the block hash from the public values and the parts.
#[instrument(skip_all, fields(height = public.height, schema = ?schema.version))]
pub fn reconstruct_block_hash(
    public: &PublicValues,
    parts: &BlockHeaderMerkleParts,
    schema: &HeaderSchema,
) -> Result<StdByteArray, HeaderError> {
    let mut hasher = DefaultHash::new();
    let plan = schema.disclosure_plan()?;
    let public_leaves = public_leaf_hashes(public, schema, &mut hasher)?;
    let root = reconstruct_root(&plan, &public_leaves, &parts.to_array(), &mut hasher)?;
    tracing::debug!("Reconstructed block hash {}", hex::encode(root));
    Ok(root)
}

/// Rebuild the block hash and compare it with one trusted from consensus.
///
/// A mismatch is a normal outcome and is reported as `Rejected`, not as an error.
#[instrument(skip_all, fields(height = public.height))]
pub fn verify_block_hash(
    public: &PublicValues,
    parts: &BlockHeaderMerkleParts,
    trusted_hash: &StdByteArray,
    schema: &HeaderSchema,
) -> Result<VerificationResult, HeaderError> {
    let computed = reconstruct_block_hash(public, parts, schema)?;
    if computed == *trusted_hash {
        return Ok(VerificationResult::Accepted);
    }
    tracing::info!(
        "Header proof rejected: expected {}, computed {}",
        hex::encode(trusted_hash),
        hex::encode(computed)
    );
    Ok(VerificationResult::Rejected {
        expected: *trusted_hash,
        computed,
    })
}
