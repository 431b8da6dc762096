//! In-memory membership repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::group::{
    domain::{GroupId, Membership, MembershipId, UserId},
    ports::{GroupRepositoryError, GroupRepositoryResult, MembershipRepository},
};

/// Thread-safe in-memory membership repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipRepository {
    state: Arc<RwLock<InMemoryMembershipState>>,
}

#[derive(Debug, Default)]
struct InMemoryMembershipState {
    memberships: HashMap<MembershipId, Membership>,
    pair_index: HashMap<(UserId, GroupId), MembershipId>,
}

impl InMemoryMembershipRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> GroupRepositoryError {
    GroupRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn store(&self, membership: &Membership) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let pair = (membership.user(), membership.group());
        if state.pair_index.contains_key(&pair) {
            return Err(GroupRepositoryError::DuplicateMembership {
                user: membership.user(),
                group: membership.group(),
            });
        }
        state.pair_index.insert(pair, membership.id());
        state.memberships.insert(membership.id(), membership.clone());
        Ok(())
    }

    async fn update(&self, membership: &Membership) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.memberships.contains_key(&membership.id()) {
            return Err(GroupRepositoryError::MembershipNotFound(membership.id()));
        }
        state.memberships.insert(membership.id(), membership.clone());
        Ok(())
    }

    async fn delete(&self, id: MembershipId) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .memberships
            .remove(&id)
            .ok_or(GroupRepositoryError::MembershipNotFound(id))?;
        state.pair_index.remove(&(removed.user(), removed.group()));
        Ok(())
    }

    async fn find_by_id(&self, id: MembershipId) -> GroupRepositoryResult<Option<Membership>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.memberships.get(&id).cloned())
    }

    async fn find_by_user_and_group(
        &self,
        user: UserId,
        group: GroupId,
    ) -> GroupRepositoryResult<Option<Membership>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .pair_index
            .get(&(user, group))
            .and_then(|id| state.memberships.get(id))
            .cloned())
    }

    async fn find_by_group(&self, group: GroupId) -> GroupRepositoryResult<Vec<Membership>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .memberships
            .values()
            .filter(|row| row.group() == group)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user: UserId) -> GroupRepositoryResult<Vec<Membership>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .memberships
            .values()
            .filter(|row| row.user() == user)
            .cloned()
            .collect())
    }
}
