//! Whitelist errors.
//!
//! Only configuration problems are errors. A non-member query is a normal
//! `false` result and never surfaces here.

use thiserror::Error;

/// Errors that can occur while configuring the whitelist.
#[derive(Error, Debug)]
pub enum WhitelistError {
    #[error("Member set is empty")]
    EmptyMemberSet,

    #[error("Member at index {0} is blank")]
    BlankMember(usize),

    #[error("Member {identity:?} appears more than once (indices {first} and {second})")]
    DuplicateMember {
        identity: String,
        first: usize,
        second: usize,
    },

    #[error("Computed root {actual} does not match configured root {expected}")]
    RootMismatch { expected: String, actual: String },

    #[error("Invalid hash {0:?}: expected 32 bytes of hex")]
    InvalidHash(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl WhitelistError {
    /// Whether this error describes a bad roster or root rather than a
    /// failure to read one.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyMemberSet
                | Self::BlankMember(_)
                | Self::DuplicateMember { .. }
                | Self::RootMismatch { .. }
                | Self::InvalidHash(_)
        )
    }
}
