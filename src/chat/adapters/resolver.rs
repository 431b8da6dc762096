//! Scope resolver backed by the collaboration repository.

use crate::chat::domain::MessageScope;
use crate::chat::ports::{ChatRepositoryError, ScopeError, ScopeResolver};
use crate::collaboration::ports::CollaborationRepository;
use crate::group::domain::GroupId;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves collaboration-scoped boards through the collaboration store.
///
/// Group scopes resolve to themselves; soft-deleted collaborations are
/// unknown scopes, so their boards go dark along with them.
#[derive(Clone)]
pub struct CollaborationScopeResolver<R>
where
    R: CollaborationRepository,
{
    collaborations: Arc<R>,
}

impl<R> CollaborationScopeResolver<R>
where
    R: CollaborationRepository,
{
    /// Creates a resolver over a collaboration repository.
    #[must_use]
    pub const fn new(collaborations: Arc<R>) -> Self {
        Self { collaborations }
    }
}

#[async_trait]
impl<R> ScopeResolver for CollaborationScopeResolver<R>
where
    R: CollaborationRepository,
{
    async fn group_of(&self, scope: MessageScope) -> Result<GroupId, ScopeError> {
        match scope {
            MessageScope::Group { group } => Ok(group),
            MessageScope::Collaboration { collaboration } => self
                .collaborations
                .find_by_id(collaboration)
                .await
                .map_err(ChatRepositoryError::persistence)?
                .map(|row| row.group())
                .ok_or(ScopeError::UnknownScope),
        }
    }
}
