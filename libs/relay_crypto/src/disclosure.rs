//! Selective disclosure over the recursive tree shape.
//!
//! A `DisclosurePlan` marks each leaf position as `Public` (the verifier holds
//! the raw value and re-hashes it) or `Opaque` (only a precomputed digest is
//! shipped). Walking the shape from the root, a range that is entirely opaque
//! becomes one part, a range that is entirely public contributes nothing and
//! a mixed range is split further. Replaying the same walk on the verifier
//! side with the parts substituted in order rebuilds the root.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{
    errors::MerkleError,
    hashing::HashFunction,
    merkle::{branch_hash, range_hash, split_range, MerkleTree},
    types::StdByteArray,
};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Opaque,
}

/// How a leaf range relates to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coverage {
    Public,
    Opaque,
    Mixed,
}

/// Partition of leaf positions into public and opaque.
///
/// Positions are tracked in a 64-bit mask, which bounds a plan to 64 leaves.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct DisclosurePlan {
    leaf_count: usize,
    public_mask: u64,
}

impl DisclosurePlan {
    pub const MAX_LEAVES: usize = u64::BITS as usize;

    /// Build a plan from one visibility per leaf, in leaf order.
    pub fn from_visibilities(
        visibilities: impl IntoIterator<Item = Visibility>,
    ) -> Result<Self, MerkleError> {
        let mut leaf_count = 0;
        let mut public_mask = 0u64;
        for visibility in visibilities {
            if leaf_count == Self::MAX_LEAVES {
                return Err(MerkleError::TooManyLeaves {
                    max: Self::MAX_LEAVES,
                    actual: leaf_count + 1,
                });
            }
            if visibility == Visibility::Public {
                public_mask |= 1 << leaf_count;
            }
            leaf_count += 1;
        }
        Self::checked(leaf_count, public_mask)
    }

    /// Build a plan over `leaf_count` leaves where only `public` positions are public.
    pub fn with_public_positions(leaf_count: usize, public: &[usize]) -> Result<Self, MerkleError> {
        if leaf_count > Self::MAX_LEAVES {
            return Err(MerkleError::TooManyLeaves {
                max: Self::MAX_LEAVES,
                actual: leaf_count,
            });
        }
        let mut public_mask = 0u64;
        for &position in public {
            if position >= leaf_count {
                return Err(MerkleError::PositionOutOfRange {
                    position,
                    len: leaf_count,
                });
            }
            public_mask |= 1 << position;
        }
        Self::checked(leaf_count, public_mask)
    }

    fn checked(leaf_count: usize, public_mask: u64) -> Result<Self, MerkleError> {
        if leaf_count == 0 {
            return Err(MerkleError::EmptyTree);
        }
        Ok(DisclosurePlan {
            leaf_count,
            public_mask,
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn visibility(&self, position: usize) -> Visibility {
        if position < self.leaf_count && self.public_mask & (1 << position) != 0 {
            Visibility::Public
        } else {
            Visibility::Opaque
        }
    }

    /// Public positions in ascending order.
    pub fn public_positions(&self) -> Vec<usize> {
        (0..self.leaf_count)
            .filter(|&position| self.visibility(position) == Visibility::Public)
            .collect()
    }

    pub fn public_count(&self) -> usize {
        self.public_mask.count_ones() as usize
    }

    /// The maximal opaque ranges, left to right, depth first.
    pub fn opaque_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        self.collect_opaque(0..self.leaf_count, &mut ranges);
        ranges
    }

    /// Number of parts a prover ships under this plan.
    pub fn part_count(&self) -> usize {
        self.opaque_ranges().len()
    }

    fn collect_opaque(&self, range: Range<usize>, ranges: &mut Vec<Range<usize>>) {
        match self.coverage(&range) {
            Coverage::Public => {}
            Coverage::Opaque => ranges.push(range),
            Coverage::Mixed => {
                // a mixed range always holds at least two leaves
                if let Some((left, right)) = split_range(&range) {
                    self.collect_opaque(left, ranges);
                    self.collect_opaque(right, ranges);
                }
            }
        }
    }

    fn coverage(&self, range: &Range<usize>) -> Coverage {
        let mask = range_mask(range);
        let public = self.public_mask & mask;
        if public == 0 {
            Coverage::Opaque
        } else if public == mask {
            Coverage::Public
        } else {
            Coverage::Mixed
        }
    }

    /// Index into the ordered public leaf list of the first public position at or after `position`.
    fn public_offset(&self, position: usize) -> usize {
        (self.public_mask & range_mask(&(0..position))).count_ones() as usize
    }
}

fn range_mask(range: &Range<usize>) -> u64 {
    let width = range.len();
    if width == 0 {
        return 0;
    }
    let bits = if width >= DisclosurePlan::MAX_LEAVES {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    bits << range.start
}

/// Compute the ordered opaque parts of `tree` under `plan`.
///
/// A lone opaque leaf is shipped as its bare leaf digest.
pub fn extract_parts(
    tree: &MerkleTree,
    plan: &DisclosurePlan,
    hash_function: &mut impl HashFunction,
) -> Result<Vec<StdByteArray>, MerkleError> {
    if plan.leaf_count() != tree.len() {
        return Err(MerkleError::PlanSizeMismatch {
            plan: plan.leaf_count(),
            tree: tree.len(),
        });
    }
    plan.opaque_ranges()
        .into_iter()
        .map(|range| tree.hash_of_range(range, hash_function))
        .collect()
}

/// Rebuild the root from the public leaf digests and the opaque parts.
///
/// # Arguments
///
/// * `public_leaves` - One leaf digest per public position, in ascending position order.
/// * `parts` - The parts produced by `extract_parts` under the same plan, in order.
pub fn reconstruct_root(
    plan: &DisclosurePlan,
    public_leaves: &[StdByteArray],
    parts: &[StdByteArray],
    hash_function: &mut impl HashFunction,
) -> Result<StdByteArray, MerkleError> {
    if public_leaves.len() != plan.public_count() {
        return Err(MerkleError::PublicLeafCountMismatch {
            expected: plan.public_count(),
            actual: public_leaves.len(),
        });
    }
    let expected_parts = plan.part_count();
    if parts.len() != expected_parts {
        return Err(MerkleError::PartsCountMismatch {
            expected: expected_parts,
            actual: parts.len(),
        });
    }
    let mut parts = parts.iter();
    fold_range(plan, 0..plan.leaf_count(), public_leaves, &mut parts, expected_parts, hash_function)
}

fn fold_range<'a>(
    plan: &DisclosurePlan,
    range: Range<usize>,
    public_leaves: &[StdByteArray],
    parts: &mut impl Iterator<Item = &'a StdByteArray>,
    expected_parts: usize,
    hash_function: &mut impl HashFunction,
) -> Result<StdByteArray, MerkleError> {
    match plan.coverage(&range) {
        Coverage::Public => {
            let offset = plan.public_offset(range.start);
            Ok(range_hash(&public_leaves[offset..offset + range.len()], hash_function))
        }
        Coverage::Opaque => parts.next().copied().ok_or(MerkleError::PartsCountMismatch {
            expected: expected_parts,
            actual: 0,
        }),
        Coverage::Mixed => {
            let (left, right) = split_range(&range).ok_or(MerkleError::InvalidRange {
                start: range.start,
                end: range.end,
                len: plan.leaf_count(),
            })?;
            let left =
                fold_range(plan, left, public_leaves, parts, expected_parts, hash_function)?;
            let right =
                fold_range(plan, right, public_leaves, parts, expected_parts, hash_function)?;
            Ok(branch_hash(&left, &right, hash_function))
        }
    }
}

/// Reconstruct the root and compare it against a trusted digest.
pub fn verify_root(
    plan: &DisclosurePlan,
    public_leaves: &[StdByteArray],
    parts: &[StdByteArray],
    trusted_root: &StdByteArray,
    hash_function: &mut impl HashFunction,
) -> Result<bool, MerkleError> {
    Ok(reconstruct_root(plan, public_leaves, parts, hash_function)? == *trusted_root)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{hashing::DefaultHash, merkle::leaf_hash};

    fn header_plan() -> DisclosurePlan {
        DisclosurePlan::with_public_positions(14, &[2, 10]).unwrap()
    }

    fn sample_tree(n: usize) -> MerkleTree {
        let mut h = DefaultHash::new();
        let leaves = (0..n).map(|i| leaf_hash(i.to_le_bytes(), &mut h)).collect();
        MerkleTree::from_leaf_hashes(leaves).unwrap()
    }

    fn public_leaves_of(tree: &MerkleTree, plan: &DisclosurePlan) -> Vec<StdByteArray> {
        plan.public_positions().iter().map(|&p| tree.leaves()[p]).collect()
    }

    #[test]
    fn test_header_plan_ranges() {
        let plan = header_plan();
        assert_eq!(
            plan.opaque_ranges(),
            vec![0..2, 3..4, 4..8, 8..10, 11..12, 12..14]
        );
        assert_eq!(plan.part_count(), 6);
        assert_eq!(plan.public_positions(), vec![2, 10]);
        assert_eq!(plan.visibility(2), Visibility::Public);
        assert_eq!(plan.visibility(3), Visibility::Opaque);
    }

    #[test]
    fn test_header_plan_roundtrip() {
        let mut h = DefaultHash::new();
        let tree = sample_tree(14);
        let plan = header_plan();
        let parts = extract_parts(&tree, &plan, &mut h).unwrap();

        // lone opaque leaves are bare leaf digests
        assert_eq!(parts[1], tree.leaves()[3]);
        assert_eq!(parts[4], tree.leaves()[11]);

        let public = public_leaves_of(&tree, &plan);
        let root = reconstruct_root(&plan, &public, &parts, &mut h).unwrap();
        assert_eq!(root, tree.root_hash(&mut h));
    }

    #[test]
    fn test_plan_from_visibilities() {
        let plan = DisclosurePlan::from_visibilities([
            Visibility::Opaque,
            Visibility::Public,
            Visibility::Opaque,
        ])
        .unwrap();
        assert_eq!(plan, DisclosurePlan::with_public_positions(3, &[1]).unwrap());
        // ((0,1),2): leaf 0 alone, then leaf 2 alone
        assert_eq!(plan.opaque_ranges(), vec![0..1, 2..3]);
    }

    #[test]
    fn test_all_public_has_no_parts() {
        let mut h = DefaultHash::new();
        let tree = sample_tree(5);
        let plan = DisclosurePlan::with_public_positions(5, &[0, 1, 2, 3, 4]).unwrap();
        let parts = extract_parts(&tree, &plan, &mut h).unwrap();
        assert!(parts.is_empty());
        let root = reconstruct_root(&plan, tree.leaves(), &parts, &mut h).unwrap();
        assert_eq!(root, tree.root_hash(&mut h));
    }

    #[test]
    fn test_all_opaque_ships_root() {
        let mut h = DefaultHash::new();
        let tree = sample_tree(7);
        let plan = DisclosurePlan::with_public_positions(7, &[]).unwrap();
        let parts = extract_parts(&tree, &plan, &mut h).unwrap();
        assert_eq!(parts, vec![tree.root_hash(&mut h)]);
        assert_eq!(reconstruct_root(&plan, &[], &parts, &mut h).unwrap(), parts[0]);
    }

    #[test]
    fn test_plan_errors() {
        assert_eq!(
            DisclosurePlan::with_public_positions(0, &[]),
            Err(MerkleError::EmptyTree)
        );
        assert_eq!(
            DisclosurePlan::with_public_positions(65, &[]),
            Err(MerkleError::TooManyLeaves { max: 64, actual: 65 })
        );
        assert_eq!(
            DisclosurePlan::with_public_positions(4, &[4]),
            Err(MerkleError::PositionOutOfRange { position: 4, len: 4 })
        );
        assert_eq!(
            DisclosurePlan::from_visibilities(std::iter::repeat(Visibility::Opaque).take(65)),
            Err(MerkleError::TooManyLeaves { max: 64, actual: 65 })
        );
    }

    #[test]
    fn test_full_width_plan() {
        let mut h = DefaultHash::new();
        let tree = sample_tree(64);
        let plan = DisclosurePlan::with_public_positions(64, &[0, 63]).unwrap();
        let parts = extract_parts(&tree, &plan, &mut h).unwrap();
        let public = public_leaves_of(&tree, &plan);
        let root = reconstruct_root(&plan, &public, &parts, &mut h).unwrap();
        assert_eq!(root, tree.root_hash(&mut h));
    }

    #[test]
    fn test_count_mismatches() {
        let mut h = DefaultHash::new();
        let tree = sample_tree(14);
        let plan = header_plan();
        let parts = extract_parts(&tree, &plan, &mut h).unwrap();
        let public = public_leaves_of(&tree, &plan);

        assert_eq!(
            reconstruct_root(&plan, &public[..1], &parts, &mut h),
            Err(MerkleError::PublicLeafCountMismatch { expected: 2, actual: 1 })
        );
        assert_eq!(
            reconstruct_root(&plan, &public, &parts[..5], &mut h),
            Err(MerkleError::PartsCountMismatch { expected: 6, actual: 5 })
        );
        assert_eq!(
            extract_parts(&sample_tree(13), &plan, &mut h),
            Err(MerkleError::PlanSizeMismatch { plan: 14, tree: 13 })
        );
    }

    #[test]
    fn test_verify_root_rejects_tampered_part() {
        let mut h = DefaultHash::new();
        let tree = sample_tree(14);
        let plan = header_plan();
        let mut parts = extract_parts(&tree, &plan, &mut h).unwrap();
        let public = public_leaves_of(&tree, &plan);
        let root = tree.root_hash(&mut h);

        assert!(verify_root(&plan, &public, &parts, &root, &mut h).unwrap());
        parts[2][0] ^= 1;
        assert!(!verify_root(&plan, &public, &parts, &root, &mut h).unwrap());
    }

    proptest! {
        #[test]
        fn prop_roundtrip_any_plan(n in 1usize..=64, mask in any::<u64>(), seed in any::<u8>()) {
            let mut h = DefaultHash::new();
            let leaves: Vec<StdByteArray> =
                (0..n).map(|i| leaf_hash([seed, i as u8], &mut h)).collect();
            let tree = MerkleTree::from_leaf_hashes(leaves).unwrap();
            let public: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
            let plan = DisclosurePlan::with_public_positions(n, &public).unwrap();

            let parts = extract_parts(&tree, &plan, &mut h).unwrap();
            prop_assert_eq!(parts.len(), plan.part_count());
            let public_leaves = public_leaves_of(&tree, &plan);
            let root = reconstruct_root(&plan, &public_leaves, &parts, &mut h).unwrap();
            prop_assert_eq!(root, tree.root_hash(&mut h));
        }

        #[test]
        fn prop_opaque_ranges_cover_exactly_the_opaque_leaves(
            n in 1usize..=64,
            mask in any::<u64>(),
        ) {
            let public: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
            let plan = DisclosurePlan::with_public_positions(n, &public).unwrap();
            let covered: Vec<usize> = plan.opaque_ranges().into_iter().flatten().collect();
            let opaque: Vec<usize> = (0..n).filter(|i| mask & (1 << i) == 0).collect();
            prop_assert_eq!(covered, opaque);
        }
    }
}
