//! Tagged-variant element shared by tasks and milestones.

use super::{ElementId, Milestone, Task};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a persisted element kind fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown element kind: {0}")]
pub struct ParseElementKindError(pub String);

/// Discriminant of an element's payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A completable task.
    Task,
    /// A dated milestone.
    Milestone,
}

impl ElementKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Milestone => "milestone",
        }
    }
}

impl TryFrom<&str> for ElementKind {
    type Error = ParseElementKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "task" => Ok(Self::Task),
            "milestone" => Ok(Self::Milestone),
            _ => Err(ParseElementKindError(value.to_owned())),
        }
    }
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementBody {
    /// Task payload.
    Task(Task),
    /// Milestone payload.
    Milestone(Milestone),
}

impl ElementBody {
    /// Returns the payload kind discriminant.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Task(_) => ElementKind::Task,
            Self::Milestone(_) => ElementKind::Milestone,
        }
    }
}

/// One entry in a collaboration's ordered element sequence.
///
/// Tasks and milestones share one identifier and one position space; the
/// element wrapper carries the shared identity and timestamps while the
/// body carries the kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    body: ElementBody,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedElementData {
    /// Persisted element identifier.
    pub id: ElementId,
    /// Persisted payload.
    pub body: ElementBody,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Element {
    /// Creates a new element around a task payload.
    #[must_use]
    pub fn new_task(task: Task, clock: &impl Clock) -> Self {
        Self::new(ElementBody::Task(task), clock)
    }

    /// Creates a new element around a milestone payload.
    #[must_use]
    pub fn new_milestone(milestone: Milestone, clock: &impl Clock) -> Self {
        Self::new(ElementBody::Milestone(milestone), clock)
    }

    fn new(body: ElementBody, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ElementId::new(),
            body,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an element from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedElementData) -> Self {
        Self {
            id: data.id,
            body: data.body,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the element identifier.
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.id
    }

    /// Returns the payload kind.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    /// Returns the payload.
    #[must_use]
    pub const fn body(&self) -> &ElementBody {
        &self.body
    }

    /// Returns the display name of either payload kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.body {
            ElementBody::Task(task) => task.name(),
            ElementBody::Milestone(milestone) => milestone.name(),
        }
    }

    /// Returns the task payload, if this element is a task.
    #[must_use]
    pub const fn as_task(&self) -> Option<&Task> {
        match &self.body {
            ElementBody::Task(task) => Some(task),
            ElementBody::Milestone(_) => None,
        }
    }

    /// Returns a mutable task payload, if this element is a task.
    pub fn as_task_mut(&mut self) -> Option<&mut Task> {
        match &mut self.body {
            ElementBody::Task(task) => Some(task),
            ElementBody::Milestone(_) => None,
        }
    }

    /// Returns the milestone payload, if this element is a milestone.
    #[must_use]
    pub const fn as_milestone(&self) -> Option<&Milestone> {
        match &self.body {
            ElementBody::Milestone(milestone) => Some(milestone),
            ElementBody::Task(_) => None,
        }
    }

    /// Returns a mutable milestone payload, if this element is a milestone.
    pub fn as_milestone_mut(&mut self) -> Option<&mut Milestone> {
        match &mut self.body {
            ElementBody::Milestone(milestone) => Some(milestone),
            ElementBody::Task(_) => None,
        }
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

    /// Updates the `updated_at` timestamp to the current clock time.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
