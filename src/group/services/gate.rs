//! Membership-backed permission gate.

use crate::group::{
    domain::{GroupId, MembershipLevel, UserId},
    ports::{GateError, MembershipGate, MembershipRepository},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Classifies users against the membership store.
///
/// This is the one implementation of [`MembershipGate`] used in production;
/// every module consults it before mutating anything owned by a group.
#[derive(Clone)]
pub struct PermissionGate<M>
where
    M: MembershipRepository,
{
    memberships: Arc<M>,
}

impl<M> PermissionGate<M>
where
    M: MembershipRepository,
{
    /// Creates a gate over a membership repository.
    #[must_use]
    pub const fn new(memberships: Arc<M>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl<M> MembershipGate for PermissionGate<M>
where
    M: MembershipRepository,
{
    async fn level_for(&self, user: UserId, group: GroupId) -> Result<MembershipLevel, GateError> {
        let membership = self
            .memberships
            .find_by_user_and_group(user, group)
            .await
            .map_err(GateError::persistence)?;
        Ok(MembershipLevel::classify(membership.as_ref()))
    }
}
