//! Scope resolution port.
//!
//! The chat service gates actors on membership in a board's owning group;
//! the resolver maps either scope to that group.

use super::repository::ChatRepositoryError;
use crate::chat::domain::MessageScope;
use crate::group::domain::GroupId;
use async_trait::async_trait;
use thiserror::Error;

/// Resolves a board scope to the group that owns it.
#[async_trait]
pub trait ScopeResolver: Send + Sync {
    /// Returns the owning group of the scope.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::UnknownScope`] when the scope's target does
    /// not exist or is deleted.
    async fn group_of(&self, scope: MessageScope) -> Result<GroupId, ScopeError>;
}

/// Errors returned by scope resolution.
#[derive(Debug, Clone, Error)]
pub enum ScopeError {
    /// The scope's target does not exist or is deleted.
    #[error("unknown board scope")]
    UnknownScope,

    /// Persistence-layer failure during resolution.
    #[error(transparent)]
    Repository(#[from] ChatRepositoryError),
}
