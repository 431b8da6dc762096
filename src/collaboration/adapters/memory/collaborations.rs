//! In-memory collaboration repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::collaboration::{
    domain::{Collaboration, CollaborationId},
    ports::{CollaborationRepository, CollaborationRepositoryError, CollaborationRepositoryResult},
};
use crate::group::domain::{GroupId, Slug};

/// Thread-safe in-memory collaboration repository.
///
/// Soft-deleted rows stay in the map so `update` can still reach them, but
/// every lookup filters them out.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollaborationRepository {
    state: Arc<RwLock<InMemoryCollaborationState>>,
}

#[derive(Debug, Default)]
struct InMemoryCollaborationState {
    collaborations: HashMap<CollaborationId, Collaboration>,
    slug_index: HashMap<Slug, CollaborationId>,
}

impl InMemoryCollaborationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> CollaborationRepositoryError {
    CollaborationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CollaborationRepository for InMemoryCollaborationRepository {
    async fn store(&self, collaboration: &Collaboration) -> CollaborationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.slug_index.contains_key(collaboration.slug()) {
            return Err(CollaborationRepositoryError::DuplicateSlug(
                collaboration.slug().clone(),
            ));
        }
        state
            .slug_index
            .insert(collaboration.slug().clone(), collaboration.id());
        state
            .collaborations
            .insert(collaboration.id(), collaboration.clone());
        Ok(())
    }

    async fn update(&self, collaboration: &Collaboration) -> CollaborationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let old = state
            .collaborations
            .get(&collaboration.id())
            .ok_or(CollaborationRepositoryError::NotFound(collaboration.id()))?
            .clone();
        if old.slug() != collaboration.slug() {
            state.slug_index.remove(old.slug());
            state
                .slug_index
                .insert(collaboration.slug().clone(), collaboration.id());
        }
        state
            .collaborations
            .insert(collaboration.id(), collaboration.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: CollaborationId,
    ) -> CollaborationRepositoryResult<Option<Collaboration>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .collaborations
            .get(&id)
            .filter(|row| !row.is_deleted())
            .cloned())
    }

    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> CollaborationRepositoryResult<Option<Collaboration>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .slug_index
            .get(slug)
            .and_then(|id| state.collaborations.get(id))
            .filter(|row| !row.is_deleted())
            .cloned())
    }

    async fn find_by_group(
        &self,
        group: GroupId,
    ) -> CollaborationRepositoryResult<Vec<Collaboration>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut rows: Vec<Collaboration> = state
            .collaborations
            .values()
            .filter(|row| row.group() == group && !row.is_deleted())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(rows)
    }
}
