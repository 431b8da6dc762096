//! Error types for group domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing group domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupDomainError {
    /// The group name is empty after trimming.
    #[error("group name must not be empty")]
    EmptyGroupName,

    /// The name contains no characters usable in a slug.
    #[error("cannot derive a slug from '{0}'")]
    UnsluggableName(String),
}

/// Error returned while parsing membership statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership status: {0}")]
pub struct ParseMembershipStatusError(pub String);
