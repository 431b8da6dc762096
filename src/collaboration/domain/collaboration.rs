//! Collaboration aggregate root.

use super::{CollaborationDomainError, CollaborationId};
use crate::group::domain::{GroupDomainError, GroupId, Slug, UserRef};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Derived lifecycle status of a collaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    /// No tasks yet.
    Planning,
    /// At least one task remains open.
    Ongoing,
    /// At least one task exists and all are completed.
    Completed,
}

impl CollaborationStatus {
    /// Derives the status from task counts. Milestones do not contribute.
    #[must_use]
    pub const fn derive(task_total: usize, task_completed: usize) -> Self {
        if task_total == 0 {
            Self::Planning
        } else if task_completed == task_total {
            Self::Completed
        } else {
            Self::Ongoing
        }
    }
}

/// Filter applied when listing a group's collaborations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Only collaborations in planning.
    Planning,
    /// Only ongoing collaborations.
    Ongoing,
    /// Only completed collaborations.
    Completed,
    /// Every live collaboration.
    All,
}

impl StatusFilter {
    /// Returns `true` when the status passes the filter.
    #[must_use]
    pub const fn matches(self, status: CollaborationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Planning => matches!(status, CollaborationStatus::Planning),
            Self::Ongoing => matches!(status, CollaborationStatus::Ongoing),
            Self::Completed => matches!(status, CollaborationStatus::Completed),
        }
    }
}

/// A group-owned project with an ordered element sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    id: CollaborationId,
    group: GroupId,
    name: String,
    description: String,
    slug: Slug,
    image: Option<String>,
    created_by: UserRef,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted collaboration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCollaborationData {
    /// Persisted collaboration identifier.
    pub id: CollaborationId,
    /// Owning group identifier.
    pub group: GroupId,
    /// Persisted display name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted image path, if any.
    pub image: Option<String>,
    /// Persisted creator reference.
    pub created_by: UserRef,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-change timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-delete timestamp, if any.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Collaboration {
    /// Creates a new collaboration with a slug derived from its name.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::EmptyCollaborationName`] when the
    /// name is blank and [`CollaborationDomainError::UnsluggableName`] when
    /// no slug can be derived.
    pub fn new(
        group: GroupId,
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: UserRef,
        clock: &impl Clock,
    ) -> Result<Self, CollaborationDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CollaborationDomainError::EmptyCollaborationName);
        }
        let slug = Slug::derive(&name).map_err(|err| match err {
            GroupDomainError::UnsluggableName(raw) => {
                CollaborationDomainError::UnsluggableName(raw)
            }
            GroupDomainError::EmptyGroupName => {
                CollaborationDomainError::EmptyCollaborationName
            }
        })?;
        let timestamp = clock.utc();
        Ok(Self {
            id: CollaborationId::new(),
            group,
            name,
            description: description.into(),
            slug,
            image: None,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        })
    }

    /// Reconstructs a collaboration from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCollaborationData) -> Self {
        Self {
            id: data.id,
            group: data.group,
            name: data.name,
            description: data.description,
            slug: data.slug,
            image: data.image,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the collaboration identifier.
    #[must_use]
    pub const fn id(&self) -> CollaborationId {
        self.id
    }

    /// Returns the owning group identifier.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the URL slug.
    #[must_use]
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Returns the stored image path, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Returns the creator reference.
    #[must_use]
    pub const fn created_by(&self) -> UserRef {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-delete timestamp, if any.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` when the collaboration is soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Replaces the slug after a uniqueness collision.
    pub fn set_slug(&mut self, slug: Slug) {
        self.slug = slug;
    }

    /// Replaces the image path.
    pub fn set_image(&mut self, image: Option<String>, clock: &impl Clock) {
        self.image = image;
        self.updated_at = clock.utc();
    }

    /// Updates name and description. The slug is stable once allocated.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::EmptyCollaborationName`] when the
    /// new name is blank.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), CollaborationDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CollaborationDomainError::EmptyCollaborationName);
        }
        self.name = name;
        self.description = description.into();
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Marks the collaboration soft-deleted at the current clock time.
    pub fn soft_delete(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.deleted_at = Some(timestamp);
        self.updated_at = timestamp;
    }
}
