//! Domain-separated leaf/branch hashing and the recursive tree shape.
//!
//! The tree over `n` ordered leaves is never padded. A range of length one is
//! its own leaf digest; any longer range splits at the largest power of two
//! strictly below its length and the halves are joined with a branch hash.
//! Two trees with the same leaf count therefore always share a shape.

use std::ops::Range;

use crate::{errors::MerkleError, hashing::HashFunction, types::StdByteArray};

/// Prefix for leaf inputs.
pub const LEAF_PREFIX: u8 = 0x00;
/// Prefix for internal node inputs.
pub const BRANCH_PREFIX: u8 = 0x01;

/// Hash a leaf: `H(0x00 || data)`.
pub fn leaf_hash(data: impl AsRef<[u8]>, hash_function: &mut impl HashFunction) -> StdByteArray {
    hash_function.update([LEAF_PREFIX]);
    hash_function.update(data);
    hash_function.digest()
}

/// Hash two child digests into their parent: `H(0x01 || left || right)`.
pub fn branch_hash(
    left: &StdByteArray,
    right: &StdByteArray,
    hash_function: &mut impl HashFunction,
) -> StdByteArray {
    hash_function.update([BRANCH_PREFIX]);
    hash_function.update(left);
    hash_function.update(right);
    hash_function.digest()
}

/// Largest power of two strictly less than `length`.
///
/// Returns `None` for ranges of fewer than two leaves, which are never split.
pub fn split_point(length: usize) -> Option<usize> {
    if length < 2 {
        return None;
    }
    let bits = usize::BITS - (length - 1).leading_zeros();
    Some(1 << (bits - 1))
}

/// Split a leaf range into its left and right child ranges.
pub fn split_range(range: &Range<usize>) -> Option<(Range<usize>, Range<usize>)> {
    let k = split_point(range.len())?;
    let mid = range.start + k;
    Some((range.start..mid, mid..range.end))
}

/// Hash of a non-empty slice of leaf digests under the recursive split rule.
pub(crate) fn range_hash(
    leaves: &[StdByteArray],
    hash_function: &mut impl HashFunction,
) -> StdByteArray {
    match split_point(leaves.len()) {
        None => leaves[0],
        Some(k) => {
            let left = range_hash(&leaves[..k], hash_function);
            let right = range_hash(&leaves[k..], hash_function);
            branch_hash(&left, &right, hash_function)
        }
    }
}

/// Binary Merkle tree over an ordered list of leaf digests.
///
/// Only the leaves are stored. Internal nodes are recomputed on demand from
/// index ranges, so any contiguous range can be hashed without a node graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MerkleTree {
    leaves: Vec<StdByteArray>,
}

impl MerkleTree {
    /// Build a tree from already computed leaf digests.
    pub fn from_leaf_hashes(leaves: Vec<StdByteArray>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        Ok(MerkleTree { leaves })
    }

    pub fn leaves(&self) -> &[StdByteArray] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Combined hash of the leaves in `range`.
    ///
    /// A single-leaf range yields the bare leaf digest.
    pub fn hash_of_range(
        &self,
        range: Range<usize>,
        hash_function: &mut impl HashFunction,
    ) -> Result<StdByteArray, MerkleError> {
        if range.is_empty() || range.end > self.leaves.len() {
            return Err(MerkleError::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.leaves.len(),
            });
        }
        Ok(range_hash(&self.leaves[range], hash_function))
    }

    pub fn root_hash(&self, hash_function: &mut impl HashFunction) -> StdByteArray {
        range_hash(&self.leaves, hash_function)
    }
}

/// Generate a Merkle tree by leaf-hashing each encoded item in order.
pub fn generate_tree<T: AsRef<[u8]>>(
    data: &[T],
    hash_function: &mut impl HashFunction,
) -> Result<MerkleTree, MerkleError> {
    let leaves = data
        .iter()
        .map(|item| leaf_hash(item, hash_function))
        .collect();
    MerkleTree::from_leaf_hashes(leaves)
}

/// Root over encoded items without keeping the tree around.
pub fn hash_from_byte_slices<T: AsRef<[u8]>>(
    data: &[T],
    hash_function: &mut impl HashFunction,
) -> Result<StdByteArray, MerkleError> {
    Ok(generate_tree(data, hash_function)?.root_hash(hash_function))
}
