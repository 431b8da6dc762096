//! Membership workflows: joining, leaving, and admin actions.

use crate::group::{
    domain::{
        GroupId, Membership, MembershipId, MembershipLevel, MembershipStatus, UserId,
    },
    ports::{GroupRepository, GroupRepositoryError, MembershipRepository},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Outcome of a join request.
///
/// A duplicate request is an informational outcome, not an error: the user
/// is told and redirected, and nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A pending membership row was created.
    Requested(Membership),
    /// A row already exists for this (user, group) pair, whatever its status.
    AlreadyRequested,
}

impl JoinOutcome {
    /// User-visible notice accompanying the outcome.
    #[must_use]
    pub const fn notice(&self) -> &'static str {
        match self {
            Self::Requested(_) => {
                "Membership requested: awaiting confirmation from a group admin"
            }
            Self::AlreadyRequested => "Membership to this group has already been requested",
        }
    }
}

/// Outcome of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The membership row was deleted.
    Left,
    /// The requester holds no membership in the group.
    NotAMember,
    /// The requester is the group's sole admin and must reassign first.
    LastAdmin,
}

impl LeaveOutcome {
    /// User-visible notice accompanying the outcome.
    #[must_use]
    pub const fn notice(self) -> &'static str {
        match self {
            Self::Left => "You have left the group",
            Self::NotAMember => "You are not a member of this group",
            Self::LastAdmin => {
                "You are the last admin. Assign another admin before leaving the group"
            }
        }
    }
}

/// Outcome of an admin removing a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The membership row was deleted.
    Removed,
    /// The target is the group's sole admin and cannot be removed.
    LastAdmin,
}

/// Errors returned by membership workflows.
#[derive(Debug, Clone, Error)]
pub enum MembershipServiceError {
    /// The requesting user lacks the required membership level.
    #[error("forbidden")]
    Forbidden,

    /// The target group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The target membership row does not exist.
    #[error("membership not found: {0}")]
    MembershipNotFound(MembershipId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] GroupRepositoryError),
}

/// Result type for membership workflows.
pub type MembershipServiceResult<T> = Result<T, MembershipServiceError>;

/// Membership orchestration service.
#[derive(Clone)]
pub struct MembershipService<G, M, C>
where
    G: GroupRepository,
    M: MembershipRepository,
    C: Clock + Send + Sync,
{
    groups: Arc<G>,
    memberships: Arc<M>,
    clock: Arc<C>,
}

impl<G, M, C> MembershipService<G, M, C>
where
    G: GroupRepository,
    M: MembershipRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(groups: Arc<G>, memberships: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            groups,
            memberships,
            clock,
        }
    }

    /// Requests to join a group.
    ///
    /// Any existing row for the (user, group) pair, regardless of status,
    /// yields [`JoinOutcome::AlreadyRequested`] without mutation.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::GroupNotFound`] when the group does
    /// not exist, or a repository error.
    pub async fn request_join(
        &self,
        user: UserId,
        group: GroupId,
    ) -> MembershipServiceResult<JoinOutcome> {
        self.require_group(group).await?;

        if self
            .memberships
            .find_by_user_and_group(user, group)
            .await?
            .is_some()
        {
            debug!(%user, %group, "duplicate join request ignored");
            return Ok(JoinOutcome::AlreadyRequested);
        }

        let membership = Membership::request(user, group, &*self.clock);
        self.memberships.store(&membership).await?;
        info!(%user, %group, "membership requested");
        Ok(JoinOutcome::Requested(membership))
    }

    /// Leaves a group.
    ///
    /// The group must retain at least one admin, so the sole admin's leave
    /// request yields [`LeaveOutcome::LastAdmin`] without mutation.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::GroupNotFound`] when the group does
    /// not exist, or a repository error.
    pub async fn leave(
        &self,
        user: UserId,
        group: GroupId,
    ) -> MembershipServiceResult<LeaveOutcome> {
        self.require_group(group).await?;

        let Some(membership) = self.memberships.find_by_user_and_group(user, group).await? else {
            return Ok(LeaveOutcome::NotAMember);
        };

        if membership.status() == MembershipStatus::Admin
            && !self.has_other_admin(group, membership.id()).await?
        {
            debug!(%user, %group, "sole admin blocked from leaving");
            return Ok(LeaveOutcome::LastAdmin);
        }

        self.memberships.delete(membership.id()).await?;
        info!(%user, %group, "membership deleted");
        Ok(LeaveOutcome::Left)
    }

    /// Approves a pending membership. Requires admin standing.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Forbidden`] when the actor is not
    /// an admin of the group, or not-found/repository errors.
    pub async fn approve(
        &self,
        actor: UserId,
        membership: MembershipId,
    ) -> MembershipServiceResult<Membership> {
        self.transition(actor, membership, MembershipStatus::Current)
            .await
    }

    /// Ignores a pending membership request. Requires admin standing.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Forbidden`] when the actor is not
    /// an admin of the group, or not-found/repository errors.
    pub async fn ignore(
        &self,
        actor: UserId,
        membership: MembershipId,
    ) -> MembershipServiceResult<Membership> {
        self.transition(actor, membership, MembershipStatus::Ignored)
            .await
    }

    /// Grants admin rights to a current member. Requires admin standing.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Forbidden`] when the actor is not
    /// an admin of the group, or not-found/repository errors.
    pub async fn make_admin(
        &self,
        actor: UserId,
        membership: MembershipId,
    ) -> MembershipServiceResult<Membership> {
        self.transition(actor, membership, MembershipStatus::Admin)
            .await
    }

    /// Removes a member from the group. Requires admin standing.
    ///
    /// The sole admin cannot be removed, mirroring the leave guard.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipServiceError::Forbidden`] when the actor is not
    /// an admin of the group, or not-found/repository errors.
    pub async fn remove(
        &self,
        actor: UserId,
        membership: MembershipId,
    ) -> MembershipServiceResult<RemoveOutcome> {
        let target = self.find_membership(membership).await?;
        self.require_admin(actor, target.group()).await?;

        if target.status() == MembershipStatus::Admin
            && !self.has_other_admin(target.group(), target.id()).await?
        {
            return Ok(RemoveOutcome::LastAdmin);
        }

        self.memberships.delete(target.id()).await?;
        info!(actor = %actor, member = %target.user(), group = %target.group(), "member removed");
        Ok(RemoveOutcome::Removed)
    }

    /// Classifies the user's standing in the group.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn level_for(
        &self,
        user: UserId,
        group: GroupId,
    ) -> MembershipServiceResult<MembershipLevel> {
        let membership = self.memberships.find_by_user_and_group(user, group).await?;
        Ok(MembershipLevel::classify(membership.as_ref()))
    }

    async fn transition(
        &self,
        actor: UserId,
        membership: MembershipId,
        status: MembershipStatus,
    ) -> MembershipServiceResult<Membership> {
        let mut target = self.find_membership(membership).await?;
        self.require_admin(actor, target.group()).await?;

        target.set_status(status, &*self.clock);
        self.memberships.update(&target).await?;
        info!(
            actor = %actor,
            member = %target.user(),
            group = %target.group(),
            status = status.as_str(),
            "membership status changed"
        );
        Ok(target)
    }

    async fn find_membership(
        &self,
        id: MembershipId,
    ) -> MembershipServiceResult<Membership> {
        self.memberships
            .find_by_id(id)
            .await?
            .ok_or(MembershipServiceError::MembershipNotFound(id))
    }

    async fn require_group(&self, group: GroupId) -> MembershipServiceResult<()> {
        if self.groups.find_by_id(group).await?.is_none() {
            return Err(MembershipServiceError::GroupNotFound(group));
        }
        Ok(())
    }

    async fn require_admin(&self, actor: UserId, group: GroupId) -> MembershipServiceResult<()> {
        if !self.level_for(actor, group).await?.is_admin() {
            debug!(%actor, %group, "admin action denied");
            return Err(MembershipServiceError::Forbidden);
        }
        Ok(())
    }

    async fn has_other_admin(
        &self,
        group: GroupId,
        excluding: MembershipId,
    ) -> MembershipServiceResult<bool> {
        let rows = self.memberships.find_by_group(group).await?;
        Ok(rows
            .iter()
            .any(|row| row.status() == MembershipStatus::Admin && row.id() != excluding))
    }
}
