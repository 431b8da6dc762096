//! Repository ports for collaboration and element persistence.

use crate::collaboration::domain::{
    Collaboration, CollaborationDomainError, CollaborationId, ElementSequence,
};
use crate::group::domain::{GroupId, Slug};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for collaboration repository operations.
pub type CollaborationRepositoryResult<T> = Result<T, CollaborationRepositoryError>;

/// Collaboration persistence contract.
///
/// Lookup methods return only live (not soft-deleted) collaborations;
/// soft-deleted rows behave as absent.
#[async_trait]
pub trait CollaborationRepository: Send + Sync {
    /// Stores a new collaboration.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationRepositoryError::DuplicateSlug`] when the slug
    /// is already taken.
    async fn store(&self, collaboration: &Collaboration) -> CollaborationRepositoryResult<()>;

    /// Persists changes to an existing collaboration, including its
    /// soft-delete timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationRepositoryError::NotFound`] when the
    /// collaboration does not exist.
    async fn update(&self, collaboration: &Collaboration) -> CollaborationRepositoryResult<()>;

    /// Finds a live collaboration by identifier.
    async fn find_by_id(
        &self,
        id: CollaborationId,
    ) -> CollaborationRepositoryResult<Option<Collaboration>>;

    /// Finds a live collaboration by slug.
    async fn find_by_slug(
        &self,
        slug: &Slug,
    ) -> CollaborationRepositoryResult<Option<Collaboration>>;

    /// Returns a group's live collaborations, newest first.
    async fn find_by_group(
        &self,
        group: GroupId,
    ) -> CollaborationRepositoryResult<Vec<Collaboration>>;
}

/// Monotonic revision guarding a collaboration's element sequence.
///
/// Every successful store advances the revision by one. Loads return the
/// revision alongside the sequence; a store only succeeds while the
/// persisted revision still matches, so the whole load, mutate, store
/// cycle serialises per collaboration and no writer can overwrite state it
/// never saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceRevision(i64);

impl SequenceRevision {
    /// Revision of a collaboration that has never stored elements.
    #[must_use]
    pub const fn initial() -> Self {
        Self(0)
    }

    /// Revision the next successful store will persist.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw persisted value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Rebuilds a revision from its persisted value.
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        Self(value)
    }
}

/// Element sequence persistence contract.
///
/// The write path is load, mutate in memory, store. `store_sequence`
/// replaces the collaboration's whole position assignment atomically and
/// rejects a store whose revision is no longer current, so concurrent
/// cycles cannot interleave partial position shifts or silently drop each
/// other's elements. Services retry a rejected store against a fresh load.
#[async_trait]
pub trait ElementStore: Send + Sync {
    /// Loads the collaboration's element sequence and its current revision,
    /// validating density.
    ///
    /// An empty sequence at [`SequenceRevision::initial`] is returned for a
    /// collaboration with no elements.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationRepositoryError::CorruptSequence`] when the
    /// persisted positions violate the dense-position invariant.
    async fn load_sequence(
        &self,
        collaboration: CollaborationId,
    ) -> CollaborationRepositoryResult<(ElementSequence, SequenceRevision)>;

    /// Atomically replaces the collaboration's element sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationRepositoryError::StaleSequence`] when the
    /// persisted revision no longer equals `expected`; the caller must
    /// reload and reapply its mutation.
    async fn store_sequence(
        &self,
        collaboration: CollaborationId,
        sequence: &ElementSequence,
        expected: SequenceRevision,
    ) -> CollaborationRepositoryResult<()>;
}

/// Errors returned by collaboration repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CollaborationRepositoryError {
    /// A collaboration with the same slug already exists.
    #[error("duplicate collaboration slug: {0}")]
    DuplicateSlug(Slug),

    /// The collaboration was not found (or is soft-deleted).
    #[error("collaboration not found: {0}")]
    NotFound(CollaborationId),

    /// Persisted element positions violate the dense-position invariant.
    #[error("corrupt element sequence for collaboration {0}: {1}")]
    CorruptSequence(CollaborationId, CollaborationDomainError),

    /// The element sequence changed since it was loaded.
    #[error("stale element sequence for collaboration {0}")]
    StaleSequence(CollaborationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CollaborationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
