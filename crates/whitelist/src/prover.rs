//! Council membership prover.
//!
//! Answers "is this wallet identity a council member?" by proving and
//! verifying inclusion of its leaf under the roster root. The tree is built
//! once at construction and only read afterwards, so a prover can be shared
//! across threads behind an `Arc`.

use crate::config::{MemberSet, WhitelistConfig};
use crate::error::WhitelistError;
use crate::hashing::hash_identity;
use crate::proof::{verify, MembershipProofBundle};
use crate::tree::MerkleTree;
use crate::Hash32;
use tracing::{debug, info, instrument};

/// Membership prover over a fixed roster.
#[derive(Debug, Clone)]
pub struct MembershipProver {
    members: MemberSet,
    tree: MerkleTree,
}

impl MembershipProver {
    /// Build a prover for a validated roster.
    #[must_use]
    pub fn new(members: MemberSet) -> Self {
        let tree = MerkleTree::build(&members);
        info!(
            members = members.len(),
            root = %tree.root_hex(),
            "Council whitelist ready"
        );
        Self { members, tree }
    }

    /// Build a prover from raw identifiers.
    ///
    /// # Errors
    /// Returns a configuration error if the roster is empty or malformed.
    pub fn from_members<I, S>(members: I) -> Result<Self, WhitelistError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = MemberSet::new(members.into_iter().map(Into::into).collect())?;
        Ok(Self::new(members))
    }

    /// Build a prover from a loaded configuration, checking the computed root
    /// against the configured one when present.
    ///
    /// # Errors
    /// Returns a configuration error for an invalid roster, an undecodable
    /// root, or a root mismatch.
    pub fn from_config(config: WhitelistConfig) -> Result<Self, WhitelistError> {
        let (members, expected_root) = config.into_parts()?;
        let prover = Self::new(members);

        if let Some(expected) = expected_root {
            if expected != prover.root() {
                return Err(WhitelistError::RootMismatch {
                    expected: hex::encode(expected),
                    actual: prover.root_hex(),
                });
            }
        }

        Ok(prover)
    }

    /// Whether `identity` is a council member.
    #[instrument(skip(self))]
    pub fn is_member(&self, identity: &str) -> bool {
        let leaf = hash_identity(identity);
        let Some(proof) = self.tree.proof(&leaf) else {
            debug!("Identity not in whitelist");
            return false;
        };

        let valid = verify(&proof, &leaf, &self.root());
        debug!(valid, "Checked whitelist proof");
        valid
    }

    /// Exportable proof that `identity` is a member, or `None` if it is not.
    #[must_use]
    pub fn prove(&self, identity: &str) -> Option<MembershipProofBundle> {
        let leaf = hash_identity(identity);
        let proof = self.tree.proof(&leaf)?;
        Some(MembershipProofBundle {
            identity: identity.to_string(),
            leaf,
            root: self.root(),
            proof,
        })
    }

    /// Check a bundle produced by any prover against this roster's root.
    #[must_use]
    pub fn verify_bundle(&self, bundle: &MembershipProofBundle) -> bool {
        bundle.verify_against(&self.root())
    }

    #[must_use]
    pub fn root(&self) -> Hash32 {
        self.tree.root()
    }

    #[must_use]
    pub fn root_hex(&self) -> String {
        self.tree.root_hex()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn members(&self) -> &MemberSet {
        &self.members
    }

    #[must_use]
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }
}
