//! Identity and node hashing.
//!
//! Every leaf, whether it comes from the roster or from a query, goes through
//! [`hash_identity`]. Keeping a single pipeline is what lets a queried wallet
//! identity land on the same leaf as its roster entry.

use crate::Hash32;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Keccak-256 of the UTF-8 bytes of `raw`, as lowercase hex without `0x`.
#[must_use]
pub fn keccak_hex(raw: &str) -> String {
    hex::encode(Keccak256::digest(raw.as_bytes()))
}

/// Hash a wallet identity into a leaf.
///
/// The second stage hashes the hex text of the Keccak digest, not its raw
/// bytes.
#[must_use]
pub fn hash_identity(raw: &str) -> Hash32 {
    Sha256::digest(keccak_hex(raw).as_bytes()).into()
}

/// SHA-256 of two 32-byte nodes
#[must_use]
pub fn hash_pair(left: &Hash32, right: &Hash32) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
