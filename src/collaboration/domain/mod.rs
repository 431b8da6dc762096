//! Domain model for collaborations.
//!
//! The centrepiece is [`ElementSequence`]: one ordered container per
//! collaboration holding both element kinds, so the dense-position
//! invariant is a structural property rather than an emergent one across
//! two collections.

mod collaboration;
mod element;
mod error;
mod ids;
mod milestone;
mod sequence;
mod task;

pub use collaboration::{
    Collaboration, CollaborationStatus, PersistedCollaborationData, StatusFilter,
};
pub use element::{
    Element, ElementBody, ElementKind, ParseElementKindError, PersistedElementData,
};
pub use error::CollaborationDomainError;
pub use ids::{CollaborationId, ElementId};
pub use milestone::Milestone;
pub use sequence::{ElementSequence, MoveOutcome};
pub use task::{Completion, Task, ToggleAction};
