//! Board workflows: posting and reading messages.

use crate::chat::{
    domain::{ChatDomainError, Message, MessageScope},
    ports::{ChatRepositoryError, MessageRepository, ScopeError, ScopeResolver},
};
use crate::group::domain::{UserId, UserRef};
use crate::group::ports::{GateError, MembershipGate};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors returned by board workflows.
#[derive(Debug, Clone, Error)]
pub enum BoardServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),

    /// The requesting user lacks active membership in the owning group.
    #[error("forbidden")]
    Forbidden,

    /// The board's scope does not resolve to a live target.
    #[error("unknown board scope")]
    UnknownScope,

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ChatRepositoryError),
}

impl From<ScopeError> for BoardServiceError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::UnknownScope => Self::UnknownScope,
            ScopeError::Repository(source) => Self::Repository(source),
        }
    }
}

impl From<GateError> for BoardServiceError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::GroupNotFound(_) => Self::UnknownScope,
            GateError::Persistence(source) => {
                Self::Repository(ChatRepositoryError::Persistence(source))
            }
        }
    }
}

/// Result type for board workflows.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Board orchestration service.
///
/// Both posting and reading require active membership in the owning
/// group; boards are invisible to outsiders rather than read-only.
#[derive(Clone)]
pub struct BoardService<M, S, G, C>
where
    M: MessageRepository,
    S: ScopeResolver,
    G: MembershipGate,
    C: Clock + Send + Sync,
{
    messages: Arc<M>,
    resolver: Arc<S>,
    gate: Arc<G>,
    clock: Arc<C>,
}

impl<M, S, G, C> BoardService<M, S, G, C>
where
    M: MessageRepository,
    S: ScopeResolver,
    G: MembershipGate,
    C: Clock + Send + Sync,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(messages: Arc<M>, resolver: Arc<S>, gate: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            messages,
            resolver,
            gate,
            clock,
        }
    }

    /// Posts a message to a board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for non-members, or
    /// validation/scope/repository errors.
    pub async fn post(
        &self,
        actor: UserId,
        scope: MessageScope,
        body: impl Into<String> + Send,
    ) -> BoardServiceResult<Message> {
        self.require_member(actor, scope).await?;
        let message = Message::post(scope, UserRef::to_user(actor), body, &*self.clock)?;
        self.messages.store(&message).await?;
        info!(message = %message.id(), "message posted");
        Ok(message)
    }

    /// Returns a board's messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Forbidden`] for non-members, or
    /// scope/repository errors.
    pub async fn list(
        &self,
        actor: UserId,
        scope: MessageScope,
    ) -> BoardServiceResult<Vec<Message>> {
        self.require_member(actor, scope).await?;
        Ok(self.messages.find_by_scope(scope).await?)
    }

    async fn require_member(&self, actor: UserId, scope: MessageScope) -> BoardServiceResult<()> {
        let group = self.resolver.group_of(scope).await?;
        if !self.gate.level_for(actor, group).await?.is_member() {
            return Err(BoardServiceError::Forbidden);
        }
        Ok(())
    }
}
