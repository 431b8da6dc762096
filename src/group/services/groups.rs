//! Group lifecycle orchestration.

use crate::group::{
    domain::{Group, GroupDomainError, GroupId, Membership, MembershipStatus, UserId, UserRef},
    ports::{GroupRepository, GroupRepositoryError, MembershipRepository},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Attempts made to deduplicate a colliding slug before giving up.
const MAX_SLUG_ATTEMPTS: u32 = 5;

/// Request payload for creating a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroupRequest {
    name: String,
    description: String,
}

impl CreateGroupRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Errors returned by group lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum GroupServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] GroupDomainError),

    /// The requesting user lacks admin standing in the group.
    #[error("forbidden")]
    Forbidden,

    /// The group does not exist.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// No free slug was found after deduplication attempts.
    #[error("could not allocate a unique slug for '{0}'")]
    SlugExhausted(String),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] GroupRepositoryError),
}

/// Result type for group lifecycle operations.
pub type GroupServiceResult<T> = Result<T, GroupServiceError>;

/// Group lifecycle service.
///
/// Creating a group seeds the creator as its founding admin so the
/// at-least-one-admin invariant holds from the first row.
#[derive(Clone)]
pub struct GroupService<G, M, C>
where
    G: GroupRepository,
    M: MembershipRepository,
    C: Clock + Send + Sync,
{
    groups: Arc<G>,
    memberships: Arc<M>,
    clock: Arc<C>,
}

impl<G, M, C> GroupService<G, M, C>
where
    G: GroupRepository,
    M: MembershipRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new group service.
    #[must_use]
    pub const fn new(groups: Arc<G>, memberships: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            groups,
            memberships,
            clock,
        }
    }

    /// Creates a group and its founding admin membership.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError`] when validation fails, the slug cannot
    /// be made unique, or persistence rejects the rows.
    pub async fn create(
        &self,
        actor: UserId,
        request: CreateGroupRequest,
    ) -> GroupServiceResult<Group> {
        let mut group = Group::new(
            request.name,
            request.description,
            UserRef::to_user(actor),
            &*self.clock,
        )?;

        let base_slug = group.slug().clone();
        let mut attempt = 0_u32;
        loop {
            match self.groups.store(&group).await {
                Ok(()) => break,
                Err(GroupRepositoryError::DuplicateSlug(_)) if attempt < MAX_SLUG_ATTEMPTS => {
                    attempt = attempt.saturating_add(1);
                    group.set_slug(base_slug.deduplicated(attempt));
                }
                Err(GroupRepositoryError::DuplicateSlug(_)) => {
                    return Err(GroupServiceError::SlugExhausted(group.name().to_owned()));
                }
                Err(err) => return Err(err.into()),
            }
        }

        let founder = Membership::with_status(
            actor,
            group.id(),
            MembershipStatus::Admin,
            &*self.clock,
        );
        self.memberships.store(&founder).await?;
        info!(group = %group.id(), slug = %group.slug(), "group created");
        Ok(group)
    }

    /// Updates a group's name and description. Requires admin standing.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Forbidden`] for non-admins, or
    /// validation/repository errors.
    pub async fn update(
        &self,
        actor: UserId,
        group_id: GroupId,
        request: CreateGroupRequest,
    ) -> GroupServiceResult<Group> {
        let mut group = self.find_group(group_id).await?;
        self.require_admin(actor, group_id).await?;
        group.rename(request.name, request.description, &*self.clock)?;
        self.groups.update(&group).await?;
        Ok(group)
    }

    /// Deletes a group. Requires admin standing; owned rows cascade.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Forbidden`] for non-admins, or
    /// not-found/repository errors.
    pub async fn delete(&self, actor: UserId, group_id: GroupId) -> GroupServiceResult<()> {
        self.find_group(group_id).await?;
        self.require_admin(actor, group_id).await?;
        self.groups.delete(group_id).await?;
        info!(group = %group_id, "group deleted");
        Ok(())
    }

    async fn find_group(&self, id: GroupId) -> GroupServiceResult<Group> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(GroupServiceError::NotFound(id))
    }

    async fn require_admin(&self, actor: UserId, group: GroupId) -> GroupServiceResult<()> {
        let membership = self
            .memberships
            .find_by_user_and_group(actor, group)
            .await?;
        if !crate::group::domain::MembershipLevel::classify(membership.as_ref()).is_admin() {
            return Err(GroupServiceError::Forbidden);
        }
        Ok(())
    }
}
