//! Task payload and its completion state machine.

use super::CollaborationDomainError;
use crate::group::domain::{UserId, UserRef};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One-click transition requested against a task.
///
/// Unknown action strings parse to `None`; callers treat that as a
/// refresh-only no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    /// Mark the task completed.
    Complete,
    /// Reopen the task, clearing the completion payload.
    Undo,
}

impl ToggleAction {
    /// Parses the wire form of a toggle action.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "complete" => Some(Self::Complete),
            "undo" => Some(Self::Undo),
            _ => None,
        }
    }
}

/// Completion payload recorded when a task is marked done.
///
/// Grouping all four fields in one struct makes the undo transition
/// atomic by construction: clearing completion removes the timestamp,
/// the completing user, the notes, and the attachment together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    completed_at: DateTime<Utc>,
    completed_by: UserRef,
    notes: Option<String>,
    attachment: Option<String>,
}

impl Completion {
    /// Creates a bare completion record without details.
    #[must_use]
    pub const fn new(completed_at: DateTime<Utc>, completed_by: UserRef) -> Self {
        Self {
            completed_at,
            completed_by,
            notes: None,
            attachment: None,
        }
    }

    /// Reconstructs a completion record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        completed_at: DateTime<Utc>,
        completed_by: UserRef,
        notes: Option<String>,
        attachment: Option<String>,
    ) -> Self {
        Self {
            completed_at,
            completed_by,
            notes,
            attachment,
        }
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Returns the completing user reference.
    #[must_use]
    pub const fn completed_by(&self) -> UserRef {
        self.completed_by
    }

    /// Returns the completion notes, if recorded.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the stored attachment path, if any.
    #[must_use]
    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }
}

/// Task payload within an element.
///
/// Externally a task is either `Open` (no completion payload) or
/// `Completed` (payload present); the payload carries richer detail when
/// the prompt-for-details flag asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    name: String,
    description: String,
    assigned_to: Option<UserId>,
    prompt_for_details: bool,
    completion: Option<Completion>,
}

impl Task {
    /// Creates a new open task.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::EmptyElementName`] when the name
    /// is blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        assigned_to: Option<UserId>,
        prompt_for_details: bool,
    ) -> Result<Self, CollaborationDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CollaborationDomainError::EmptyElementName);
        }
        Ok(Self {
            name,
            description: description.into(),
            assigned_to,
            prompt_for_details,
            completion: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        name: String,
        description: String,
        assigned_to: Option<UserId>,
        prompt_for_details: bool,
        completion: Option<Completion>,
    ) -> Self {
        Self {
            name,
            description,
            assigned_to,
            prompt_for_details,
            completion,
        }
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assigned member, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns `true` when completion should prompt for notes and a file.
    #[must_use]
    pub const fn prompt_for_details(&self) -> bool {
        self.prompt_for_details
    }

    /// Returns the completion payload, if the task is completed.
    #[must_use]
    pub const fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    /// Returns `true` when the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    /// Marks the task completed by the acting user at the current time.
    ///
    /// Completing an already-completed task refreshes the timestamp and
    /// the acting user, discarding earlier details.
    pub fn complete(&mut self, actor: UserId, clock: &impl Clock) {
        self.completion = Some(Completion::new(clock.utc(), UserRef::to_user(actor)));
    }

    /// Reopens the task.
    ///
    /// Clears the whole completion payload (timestamp, user, notes, and
    /// attachment) in one step. Reopening an open task is a no-op.
    pub fn reopen(&mut self) {
        self.completion = None;
    }

    /// Records completion notes and an optional attachment path.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::DetailsOnOpenTask`] when the
    /// task is not completed.
    pub fn record_details(
        &mut self,
        notes: Option<String>,
        attachment: Option<String>,
    ) -> Result<(), CollaborationDomainError> {
        let Some(completion) = self.completion.take() else {
            return Err(CollaborationDomainError::DetailsOnOpenTask);
        };
        self.completion = Some(Completion::from_persisted(
            completion.completed_at(),
            completion.completed_by(),
            notes,
            attachment,
        ));
        Ok(())
    }

    /// Updates the editable task fields. Completion state is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::EmptyElementName`] when the new
    /// name is blank.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        assigned_to: Option<UserId>,
        prompt_for_details: bool,
    ) -> Result<(), CollaborationDomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CollaborationDomainError::EmptyElementName);
        }
        self.name = name;
        self.description = description.into();
        self.assigned_to = assigned_to;
        self.prompt_for_details = prompt_for_details;
        Ok(())
    }
}
