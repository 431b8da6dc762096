//! Group aggregate root.

use super::{GroupDomainError, GroupId, Slug, UserRef};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A community of users who run collaborations together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: String,
    description: String,
    slug: Slug,
    created_by: UserRef,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGroupData {
    /// Persisted group identifier.
    pub id: GroupId,
    /// Persisted display name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted slug.
    pub slug: Slug,
    /// Persisted creator reference.
    pub created_by: UserRef,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group with a slug derived from its name.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::EmptyGroupName`] when the name is blank
    /// and [`GroupDomainError::UnsluggableName`] when no slug can be derived.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: UserRef,
        clock: &impl Clock,
    ) -> Result<Self, GroupDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GroupDomainError::EmptyGroupName);
        }
        let slug = Slug::derive(&name)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: GroupId::new(),
            name,
            description: description.into(),
            slug,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a group from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedGroupData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            slug: data.slug,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
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

    /// Replaces the slug after a uniqueness collision.
    pub fn set_slug(&mut self, slug: Slug) {
        self.slug = slug;
    }

    /// Updates name and description. The slug is stable once allocated.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::EmptyGroupName`] when the new name is
    /// blank.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), GroupDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GroupDomainError::EmptyGroupName);
        }
        self.name = name;
        self.description = description.into();
        self.updated_at = clock.utc();
        Ok(())
    }
}
