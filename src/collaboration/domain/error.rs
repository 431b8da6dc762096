//! Error types for collaboration domain validation.

use super::ElementId;
use thiserror::Error;

/// Errors returned while constructing or mutating collaboration domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaborationDomainError {
    /// The collaboration name is empty after trimming.
    #[error("collaboration name must not be empty")]
    EmptyCollaborationName,

    /// The element name is empty after trimming.
    #[error("element name must not be empty")]
    EmptyElementName,

    /// The name contains no characters usable in a slug.
    #[error("cannot derive a slug from '{0}'")]
    UnsluggableName(String),

    /// Two persisted elements claim the same position.
    #[error("duplicate element position {position}")]
    DuplicatePosition {
        /// The position claimed more than once.
        position: usize,
    },

    /// The persisted positions are not a dense zero-based range.
    #[error("element position gap: expected {expected}, found {found}")]
    PositionGap {
        /// The position the dense range requires next.
        expected: usize,
        /// The position actually found.
        found: usize,
    },

    /// The element is not part of this sequence.
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),

    /// Completion details were supplied for a task that is not completed.
    #[error("completion details require a completed task")]
    DetailsOnOpenTask,

    /// A task-only operation was applied to a milestone.
    #[error("element {0} is not a task")]
    NotATask(ElementId),

    /// A milestone-only operation was applied to a task.
    #[error("element {0} is not a milestone")]
    NotAMilestone(ElementId),
}
