//! Collaboration lifecycle orchestration.

use super::views::CollaborationSummary;
use crate::collaboration::{
    domain::{Collaboration, CollaborationDomainError, CollaborationId, StatusFilter},
    ports::{CollaborationRepository, CollaborationRepositoryError, ElementStore},
};
use crate::group::domain::{GroupId, Slug, UserId, UserRef};
use crate::group::ports::{GateError, MembershipGate};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Attempts made to deduplicate a colliding slug before giving up.
const MAX_SLUG_ATTEMPTS: u32 = 5;

/// Request payload for creating or updating a collaboration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaborationRequest {
    name: String,
    description: String,
}

impl CollaborationRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Errors returned by collaboration lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum CollaborationServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CollaborationDomainError),

    /// The requesting user lacks the required membership level.
    #[error("forbidden")]
    Forbidden,

    /// The owning group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The collaboration does not exist or is deleted.
    #[error("collaboration not found: {0}")]
    NotFound(CollaborationId),

    /// No live collaboration carries the slug.
    #[error("unknown collaboration slug: {0}")]
    UnknownSlug(String),

    /// No free slug was found after deduplication attempts.
    #[error("could not allocate a unique slug for '{0}'")]
    SlugExhausted(String),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CollaborationRepositoryError),
}

impl From<GateError> for CollaborationServiceError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::GroupNotFound(group) => Self::GroupNotFound(group),
            GateError::Persistence(source) => {
                Self::Repository(CollaborationRepositoryError::Persistence(source))
            }
        }
    }
}

/// Result type for collaboration lifecycle operations.
pub type CollaborationServiceResult<T> = Result<T, CollaborationServiceError>;

/// Collaboration lifecycle service.
///
/// Creating, editing, and deleting collaborations are admin actions;
/// listing needs any active membership. Deletion is a soft delete so the
/// element history survives.
#[derive(Clone)]
pub struct CollaborationService<R, E, G, C>
where
    R: CollaborationRepository,
    E: ElementStore,
    G: MembershipGate,
    C: Clock + Send + Sync,
{
    collaborations: Arc<R>,
    elements: Arc<E>,
    gate: Arc<G>,
    clock: Arc<C>,
}

impl<R, E, G, C> CollaborationService<R, E, G, C>
where
    R: CollaborationRepository,
    E: ElementStore,
    G: MembershipGate,
    C: Clock + Send + Sync,
{
    /// Creates a new collaboration service.
    #[must_use]
    pub const fn new(
        collaborations: Arc<R>,
        elements: Arc<E>,
        gate: Arc<G>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            collaborations,
            elements,
            gate,
            clock,
        }
    }

    /// Creates a collaboration in a group. Requires admin standing.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationServiceError`] when validation fails, the slug
    /// cannot be made unique, or persistence rejects the row.
    pub async fn create(
        &self,
        actor: UserId,
        group: GroupId,
        request: CollaborationRequest,
    ) -> CollaborationServiceResult<Collaboration> {
        self.require_admin(actor, group).await?;
        let mut collaboration = Collaboration::new(
            group,
            request.name,
            request.description,
            UserRef::to_user(actor),
            &*self.clock,
        )?;

        let base_slug = collaboration.slug().clone();
        let mut attempt = 0_u32;
        loop {
            match self.collaborations.store(&collaboration).await {
                Ok(()) => break,
                Err(CollaborationRepositoryError::DuplicateSlug(_))
                    if attempt < MAX_SLUG_ATTEMPTS =>
                {
                    attempt = attempt.saturating_add(1);
                    collaboration.set_slug(base_slug.deduplicated(attempt));
                }
                Err(CollaborationRepositoryError::DuplicateSlug(_)) => {
                    return Err(CollaborationServiceError::SlugExhausted(
                        collaboration.name().to_owned(),
                    ));
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(collaboration = %collaboration.id(), slug = %collaboration.slug(), "collaboration created");
        Ok(collaboration)
    }

    /// Updates a collaboration's name and description. Requires admin
    /// standing.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationServiceError::Forbidden`] for non-admins, or
    /// validation/repository errors.
    pub async fn update(
        &self,
        actor: UserId,
        slug: &Slug,
        request: CollaborationRequest,
    ) -> CollaborationServiceResult<Collaboration> {
        let mut collaboration = self.find_by_slug(slug).await?;
        self.require_admin(actor, collaboration.group()).await?;
        collaboration.rename(request.name, request.description, &*self.clock)?;
        self.collaborations.update(&collaboration).await?;
        Ok(collaboration)
    }

    /// Replaces a collaboration's image path. Requires admin standing.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationServiceError::Forbidden`] for non-admins, or
    /// not-found/repository errors.
    pub async fn set_image(
        &self,
        actor: UserId,
        slug: &Slug,
        image: Option<String>,
    ) -> CollaborationServiceResult<Collaboration> {
        let mut collaboration = self.find_by_slug(slug).await?;
        self.require_admin(actor, collaboration.group()).await?;
        collaboration.set_image(image, &*self.clock);
        self.collaborations.update(&collaboration).await?;
        Ok(collaboration)
    }

    /// Soft-deletes a collaboration. Requires admin standing.
    ///
    /// The row and its elements survive; every lookup treats the
    /// collaboration as absent from here on.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationServiceError::Forbidden`] for non-admins, or
    /// not-found/repository errors.
    pub async fn delete(&self, actor: UserId, slug: &Slug) -> CollaborationServiceResult<()> {
        let mut collaboration = self.find_by_slug(slug).await?;
        self.require_admin(actor, collaboration.group()).await?;
        collaboration.soft_delete(&*self.clock);
        self.collaborations.update(&collaboration).await?;
        info!(collaboration = %collaboration.id(), "collaboration deleted");
        Ok(())
    }

    /// Lists a group's live collaborations, newest first, filtered by
    /// derived status. Requires active membership.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationServiceError::Forbidden`] for non-members, or
    /// a repository error.
    pub async fn list_for_group(
        &self,
        actor: UserId,
        group: GroupId,
        filter: StatusFilter,
    ) -> CollaborationServiceResult<Vec<CollaborationSummary>> {
        self.require_member(actor, group).await?;
        let rows = self.collaborations.find_by_group(group).await?;
        let mut summaries = Vec::with_capacity(rows.len());
        for collaboration in &rows {
            let (sequence, _revision) = self.elements.load_sequence(collaboration.id()).await?;
            let summary = CollaborationSummary::assemble(collaboration, &sequence);
            if filter.matches(summary.status) {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    async fn find_by_slug(&self, slug: &Slug) -> CollaborationServiceResult<Collaboration> {
        self.collaborations
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| CollaborationServiceError::UnknownSlug(slug.to_string()))
    }

    async fn require_admin(
        &self,
        actor: UserId,
        group: GroupId,
    ) -> CollaborationServiceResult<()> {
        if !self.gate.level_for(actor, group).await?.is_admin() {
            return Err(CollaborationServiceError::Forbidden);
        }
        Ok(())
    }

    async fn require_member(
        &self,
        actor: UserId,
        group: GroupId,
    ) -> CollaborationServiceResult<()> {
        if !self.gate.level_for(actor, group).await?.is_member() {
            return Err(CollaborationServiceError::Forbidden);
        }
        Ok(())
    }
}
