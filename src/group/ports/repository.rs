//! Repository ports for group and membership persistence.

use crate::group::domain::{Group, GroupId, Membership, MembershipId, Slug, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for group repository operations.
pub type GroupRepositoryResult<T> = Result<T, GroupRepositoryError>;

/// Group persistence contract.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Stores a new group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::DuplicateSlug`] when the slug is
    /// already taken.
    async fn store(&self, group: &Group) -> GroupRepositoryResult<()>;

    /// Persists changes to an existing group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::GroupNotFound`] when the group does
    /// not exist.
    async fn update(&self, group: &Group) -> GroupRepositoryResult<()>;

    /// Deletes a group. Owned collaborations and memberships cascade.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::GroupNotFound`] when the group does
    /// not exist.
    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()>;

    /// Finds a group by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>>;

    /// Finds a group by slug. Returns `None` when absent.
    async fn find_by_slug(&self, slug: &Slug) -> GroupRepositoryResult<Option<Group>>;
}

/// Membership persistence contract.
///
/// Implementations enforce the one-row-per-(user, group) invariant.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Stores a new membership row.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::DuplicateMembership`] when a row for
    /// the (user, group) pair already exists.
    async fn store(&self, membership: &Membership) -> GroupRepositoryResult<()>;

    /// Persists changes to an existing membership row.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::MembershipNotFound`] when the row
    /// does not exist.
    async fn update(&self, membership: &Membership) -> GroupRepositoryResult<()>;

    /// Deletes a membership row.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::MembershipNotFound`] when the row
    /// does not exist.
    async fn delete(&self, id: MembershipId) -> GroupRepositoryResult<()>;

    /// Finds a membership row by identifier. Returns `None` when absent.
    async fn find_by_id(&self, id: MembershipId) -> GroupRepositoryResult<Option<Membership>>;

    /// Finds the membership row for a (user, group) pair, if any.
    async fn find_by_user_and_group(
        &self,
        user: UserId,
        group: GroupId,
    ) -> GroupRepositoryResult<Option<Membership>>;

    /// Returns all membership rows for a group.
    async fn find_by_group(&self, group: GroupId) -> GroupRepositoryResult<Vec<Membership>>;

    /// Returns all membership rows for a user.
    async fn find_by_user(&self, user: UserId) -> GroupRepositoryResult<Vec<Membership>>;
}

/// Errors returned by group and membership repository implementations.
#[derive(Debug, Clone, Error)]
pub enum GroupRepositoryError {
    /// A group with the same slug already exists.
    #[error("duplicate group slug: {0}")]
    DuplicateSlug(Slug),

    /// A membership row for the (user, group) pair already exists.
    #[error("membership already exists for user {user} in group {group}")]
    DuplicateMembership {
        /// The user the duplicate row belongs to.
        user: UserId,
        /// The group the duplicate row belongs to.
        group: GroupId,
    },

    /// The group was not found.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The membership row was not found.
    #[error("membership not found: {0}")]
    MembershipNotFound(MembershipId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GroupRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
