//! In-memory group repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::group::{
    domain::{Group, GroupId, Slug},
    ports::{GroupRepository, GroupRepositoryError, GroupRepositoryResult},
};

/// Thread-safe in-memory group repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupRepository {
    state: Arc<RwLock<InMemoryGroupState>>,
}

#[derive(Debug, Default)]
struct InMemoryGroupState {
    groups: HashMap<GroupId, Group>,
    slug_index: HashMap<Slug, GroupId>,
}

impl InMemoryGroupRepository {
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
impl GroupRepository for InMemoryGroupRepository {
    async fn store(&self, group: &Group) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.slug_index.contains_key(group.slug()) {
            return Err(GroupRepositoryError::DuplicateSlug(group.slug().clone()));
        }
        state.slug_index.insert(group.slug().clone(), group.id());
        state.groups.insert(group.id(), group.clone());
        Ok(())
    }

    async fn update(&self, group: &Group) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let old = state
            .groups
            .get(&group.id())
            .ok_or(GroupRepositoryError::GroupNotFound(group.id()))?
            .clone();
        if old.slug() != group.slug() {
            state.slug_index.remove(old.slug());
            state.slug_index.insert(group.slug().clone(), group.id());
        }
        state.groups.insert(group.id(), group.clone());
        Ok(())
    }

    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .groups
            .remove(&id)
            .ok_or(GroupRepositoryError::GroupNotFound(id))?;
        state.slug_index.remove(removed.slug());
        Ok(())
    }

    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.groups.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> GroupRepositoryResult<Option<Group>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .slug_index
            .get(slug)
            .and_then(|id| state.groups.get(id))
            .cloned())
    }
}
