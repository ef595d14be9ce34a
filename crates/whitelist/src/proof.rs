//! Inclusion proofs and their verification.
//!
//! A [`Proof`] is the ordered sibling path from a leaf up to the root. Each
//! step records which side the sibling sits on, since `hash_pair` is not
//! commutative.

use crate::error::WhitelistError;
use crate::hashing::{hash_identity, hash_pair};
use crate::Hash32;
use serde::{Deserialize, Serialize};

/// Position of a sibling relative to the node being hashed upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Sibling is the left input: `hash(sibling || current)`
    Left,
    /// Sibling is the right input: `hash(current || sibling)`
    Right,
}

/// One level of an inclusion proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling node hash at this level
    #[serde(with = "hash_hex")]
    pub sibling: Hash32,
    /// Which side the sibling is on
    pub side: Side,
}

/// Sibling path from a leaf to the root, leaf level first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub steps: Vec<ProofStep>,
}

impl Proof {
    /// Number of levels covered by the proof.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recompute the root implied by `leaf` and this path.
    #[must_use]
    pub fn compute_root(&self, leaf: &Hash32) -> Hash32 {
        self.steps.iter().fold(*leaf, |current, step| match step.side {
            Side::Left => hash_pair(&step.sibling, &current),
            Side::Right => hash_pair(&current, &step.sibling),
        })
    }
}

/// Check that `proof` links `leaf` to `root`.
///
/// Any mismatch is a plain `false`.
#[must_use]
pub fn verify(proof: &Proof, leaf: &Hash32, root: &Hash32) -> bool {
    proof.compute_root(leaf) == *root
}

/// Decode a 32-byte hash from hex, with or without a `0x` prefix.
///
/// # Errors
/// Returns [`WhitelistError::InvalidHash`] if the input is not 64 hex digits.
pub fn parse_hash(s: &str) -> Result<Hash32, WhitelistError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(trimmed).map_err(|_| WhitelistError::InvalidHash(s.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| WhitelistError::InvalidHash(s.to_string()))
}

/// A self-contained membership claim that can be exported as JSON and
/// checked by another party holding the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProofBundle {
    /// Wallet identity the claim is about
    pub identity: String,

    /// Leaf hash of `identity`
    #[serde(with = "hash_hex")]
    pub leaf: Hash32,

    /// Root the proof was generated against
    #[serde(with = "hash_hex")]
    pub root: Hash32,

    /// Sibling path from `leaf` to `root`
    pub proof: Proof,
}

impl MembershipProofBundle {
    /// Verify the bundle against its own embedded root.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.verify_against(&self.root)
    }

    /// Verify the bundle against a trusted root.
    ///
    /// The leaf is recomputed from `identity` so a bundle cannot pair one
    /// identity with another member's leaf.
    #[must_use]
    pub fn verify_against(&self, root: &Hash32) -> bool {
        hash_identity(&self.identity) == self.leaf && verify(&self.proof, &self.leaf, root)
    }
}

/// Serde helpers for hashes as lowercase hex strings.
pub(crate) mod hash_hex {
    use crate::Hash32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Hash32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Hash32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_hash(&s).map_err(serde::de::Error::custom)
    }
}
