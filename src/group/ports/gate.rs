//! Permission gate port.
//!
//! Other modules gate their mutations on a user's standing in the owning
//! group without depending on group services directly.

use crate::group::domain::{GroupId, MembershipLevel, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Classifies a user's standing in a group.
///
/// The gate is always consulted before any mutation; a `None` level
/// short-circuits the operation as forbidden with no side effects.
#[async_trait]
pub trait MembershipGate: Send + Sync {
    /// Returns the requesting user's membership level in the group.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when the classification lookup fails.
    async fn level_for(&self, user: UserId, group: GroupId) -> Result<MembershipLevel, GateError>;
}

/// Errors returned by permission gate implementations.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// The target group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// Persistence-layer failure during classification.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GateError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
