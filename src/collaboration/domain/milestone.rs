//! Milestone payload.

use super::CollaborationDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Milestone payload within an element: a named target date.
///
/// Milestones share the task position space but carry no completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    name: String,
    target_date: NaiveDate,
}

impl Milestone {
    /// Creates a new milestone.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::EmptyElementName`] when the name
    /// is blank.
    pub fn new(
        name: impl Into<String>,
        target_date: NaiveDate,
    ) -> Result<Self, CollaborationDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CollaborationDomainError::EmptyElementName);
        }
        Ok(Self { name, target_date })
    }

    /// Reconstructs a milestone from persisted storage.
    #[must_use]
    pub const fn from_persisted(name: String, target_date: NaiveDate) -> Self {
        Self { name, target_date }
    }

    /// Returns the milestone name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target date.
    #[must_use]
    pub const fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// Updates the editable milestone fields.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::EmptyElementName`] when the new
    /// name is blank.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        target_date: NaiveDate,
    ) -> Result<(), CollaborationDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CollaborationDomainError::EmptyElementName);
        }
        self.name = name;
        self.target_date = target_date;
        Ok(())
    }
}
