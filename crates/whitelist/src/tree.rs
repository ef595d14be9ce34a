//! Merkle tree over the council roster.
//!
//! Layers are built bottom-up with SHA-256. When a level has an odd number of
//! nodes its last node is hashed with itself. A single-leaf tree is hashed the
//! same way, so every tree has at least one level above its leaves.

use crate::config::MemberSet;
use crate::error::WhitelistError;
use crate::hashing::{hash_identity, hash_pair};
use crate::proof::{Proof, ProofStep, Side};
use crate::Hash32;

/// An immutable Merkle tree. `layers[0]` holds the leaves and the last layer
/// holds only the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Build the tree for a roster, hashing each member with [`hash_identity`].
    #[must_use]
    pub fn build(members: &MemberSet) -> Self {
        let leaves = members.into_iter().map(|m| hash_identity(m)).collect();
        Self::from_non_empty_leaves(leaves)
    }

    /// Build a tree from precomputed leaves.
    ///
    /// # Errors
    /// Returns [`WhitelistError::EmptyMemberSet`] if `leaves` is empty.
    pub fn from_leaves(leaves: Vec<Hash32>) -> Result<Self, WhitelistError> {
        if leaves.is_empty() {
            return Err(WhitelistError::EmptyMemberSet);
        }
        Ok(Self::from_non_empty_leaves(leaves))
    }

    fn from_non_empty_leaves(leaves: Vec<Hash32>) -> Self {
        debug_assert!(!leaves.is_empty());

        let mut layers = vec![leaves];
        while layers.len() == 1 || layers[layers.len() - 1].len() > 1 {
            let next: Vec<Hash32> = layers[layers.len() - 1]
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    hash_pair(left, right)
                })
                .collect();
            layers.push(next);
        }

        let tree = Self { layers };
        tracing::debug!(leaves = tree.len(), depth = tree.depth(), "Built Merkle tree");
        tree
    }

    /// The root commitment.
    #[must_use]
    pub fn root(&self) -> Hash32 {
        // Construction guarantees a final single-node layer
        self.layers[self.layers.len() - 1][0]
    }

    /// The root as lowercase hex without `0x`.
    #[must_use]
    pub fn root_hex(&self) -> String {
        hex::encode(self.root())
    }

    #[must_use]
    pub fn leaves(&self) -> &[Hash32] {
        &self.layers[0]
    }

    /// Number of leaves
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// A tree is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Number of levels above the leaves, which is also the proof length.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Position of the first leaf exactly equal to `leaf`.
    #[must_use]
    pub fn position(&self, leaf: &Hash32) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    /// Inclusion proof for `leaf`, or `None` if the leaf is not in the tree.
    #[must_use]
    pub fn proof(&self, leaf: &Hash32) -> Option<Proof> {
        let index = self.position(leaf)?;
        Some(self.proof_at(index))
    }

    /// Inclusion proof for the leaf at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn proof_at(&self, index: usize) -> Proof {
        assert!(index < self.len(), "leaf index {index} out of range for {} leaves", self.len());

        let mut pos = index;
        let steps = self.layers[..self.depth()]
            .iter()
            .map(|layer| {
                let is_right_child = pos % 2 == 1;
                let sibling_pos = pos ^ 1;
                // An odd trailing node is its own sibling
                let sibling = layer.get(sibling_pos).unwrap_or(&layer[pos]);
                pos /= 2;
                ProofStep {
                    sibling: *sibling,
                    side: if is_right_child { Side::Left } else { Side::Right },
                }
            })
            .collect();

        Proof { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::verify;

    fn members(names: &[&str]) -> MemberSet {
        MemberSet::new(names.iter().map(ToString::to_string).collect()).unwrap()
    }

    #[test]
    fn test_single_leaf_is_duplicated() {
        let tree = MerkleTree::build(&members(&["alice.testnet"]));
        let leaf = hash_identity("alice.testnet");

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root(), hash_pair(&leaf, &leaf));

        let proof = tree.proof(&leaf).unwrap();
        assert_eq!(proof.steps, vec![ProofStep { sibling: leaf, side: Side::Right }]);
        assert!(verify(&proof, &leaf, &tree.root()));
    }

    #[test]
    fn test_two_leaves() {
        let tree = MerkleTree::build(&members(&["alice.testnet", "bob.testnet"]));
        let a = hash_identity("alice.testnet");
        let b = hash_identity("bob.testnet");

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.root(), hash_pair(&a, &b));
        assert_eq!(tree.proof(&b).unwrap().steps[0].side, Side::Left);
    }

    #[test]
    fn test_odd_level_duplicates_last_node() {
        let tree = MerkleTree::from_leaves(vec![[1u8; 32], [2u8; 32], [3u8; 32]]).unwrap();

        let left = hash_pair(&[1u8; 32], &[2u8; 32]);
        let right = hash_pair(&[3u8; 32], &[3u8; 32]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.root(), hash_pair(&left, &right));

        let proof = tree.proof(&[3u8; 32]).unwrap();
        assert_eq!(proof.steps[0], ProofStep { sibling: [3u8; 32], side: Side::Right });
        assert_eq!(proof.steps[1], ProofStep { sibling: left, side: Side::Left });
        assert!(verify(&proof, &[3u8; 32], &tree.root()));
    }

    #[test]
    fn test_five_leaves_duplicates_at_every_odd_level() {
        let leaves: Vec<Hash32> = (1..=5u8).map(|i| [i; 32]).collect();
        let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();

        let l1 = [
            hash_pair(&leaves[0], &leaves[1]),
            hash_pair(&leaves[2], &leaves[3]),
            hash_pair(&leaves[4], &leaves[4]),
        ];
        let l2 = [hash_pair(&l1[0], &l1[1]), hash_pair(&l1[2], &l1[2])];
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.root(), hash_pair(&l2[0], &l2[1]));

        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof_at(i);
            assert_eq!(proof.len(), 3);
            assert!(verify(&proof, leaf, &tree.root()), "leaf {i} should verify");
        }
    }

    #[test]
    fn test_missing_leaf_has_no_proof() {
        let tree = MerkleTree::build(&members(&["alice.testnet", "bob.testnet"]));
        assert!(tree.proof(&hash_identity("carol.testnet")).is_none());
        // Lookup is by leaf hash, not by raw identity bytes
        assert!(tree.proof(&[0u8; 32]).is_none());
    }

    #[test]
    fn test_from_leaves_rejects_empty() {
        assert!(matches!(
            MerkleTree::from_leaves(vec![]),
            Err(WhitelistError::EmptyMemberSet)
        ));
    }

    #[test]
    fn test_root_hex() {
        let tree = MerkleTree::from_leaves(vec![[0xaa; 32], [0xbb; 32]]).unwrap();
        let hex_root = tree.root_hex();
        assert_eq!(hex_root.len(), 64);
        assert!(!hex_root.starts_with("0x"));
        assert_eq!(hex::decode(hex_root).unwrap(), tree.root());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_proof_at_out_of_range() {
        let tree = MerkleTree::from_leaves(vec![[1u8; 32]]).unwrap();
        let _ = tree.proof_at(1);
    }
}
