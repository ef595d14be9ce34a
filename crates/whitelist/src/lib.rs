//! # Council Whitelist
//!
//! Merkle-tree membership checks for the DAO council.
//!
//! A fixed, ordered roster of wallet account identifiers is committed to a
//! SHA-256 Merkle root. Membership of a queried identity is answered by
//! deriving an inclusion proof and verifying it against that root:
//! - leaves are `sha256(hex(keccak256(identity)))`
//! - internal nodes are `sha256(left || right)`
//! - an odd node at any level is paired with itself

pub mod config;
pub mod error;
pub mod hashing;
pub mod proof;
pub mod prover;
pub mod tree;

pub use config::{MemberSet, WhitelistConfig};
pub use error::WhitelistError;
pub use hashing::{hash_identity, hash_pair, keccak_hex};
pub use proof::{parse_hash, verify, MembershipProofBundle, Proof, ProofStep, Side};
pub use prover::MembershipProver;
pub use tree::MerkleTree;

/// A 32-byte hash: a leaf, an internal node or a root.
pub type Hash32 = [u8; 32];
