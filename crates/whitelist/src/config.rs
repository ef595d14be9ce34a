//! Roster configuration.
//!
//! The member roster is static data injected into the prover. It is loaded
//! once, validated up front, and never mutated afterwards.

use crate::error::WhitelistError;
use crate::proof::parse_hash;
use crate::Hash32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A validated, ordered, non-empty list of member identifiers.
///
/// Order matters: proofs are positional and reordering changes the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSet {
    members: Vec<String>,
}

impl MemberSet {
    /// Validate and wrap a roster.
    ///
    /// # Errors
    /// Fails if the roster is empty, contains a blank identifier, or lists the
    /// same identifier twice.
    pub fn new(members: Vec<String>) -> Result<Self, WhitelistError> {
        if members.is_empty() {
            return Err(WhitelistError::EmptyMemberSet);
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            if member.trim().is_empty() {
                return Err(WhitelistError::BlankMember(index));
            }
            if let Some(&first) = seen.get(member.as_str()) {
                return Err(WhitelistError::DuplicateMember {
                    identity: member.clone(),
                    first,
                    second: index,
                });
            }
            seen.insert(member, index);
        }

        Ok(Self { members })
    }

    /// Members in roster order
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// A validated set is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.members.iter().any(|m| m == identity)
    }
}

impl TryFrom<Vec<String>> for MemberSet {
    type Error = WhitelistError;

    fn try_from(members: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(members)
    }
}

impl<'a> IntoIterator for &'a MemberSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// On-disk whitelist configuration.
///
/// ```json
/// {
///   "members": ["alice.testnet", "bob.testnet"],
///   "root": "optional externally recorded root, hex"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhitelistConfig {
    /// Ordered council roster
    pub members: Vec<String>,

    /// Root the roster is expected to produce, if one has been published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

impl WhitelistConfig {
    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, WhitelistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WhitelistError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.display(),
            members = config.members.len(),
            pinned_root = config.root.is_some(),
            "Loaded whitelist configuration"
        );
        Ok(config)
    }

    /// Validate the roster and decode the expected root.
    ///
    /// # Errors
    /// Returns a configuration error for an invalid roster or root.
    pub fn into_parts(self) -> Result<(MemberSet, Option<Hash32>), WhitelistError> {
        let expected_root = self.root.as_deref().map(parse_hash).transpose()?;
        let members = MemberSet::new(self.members)?;
        Ok((members, expected_root))
    }
}
