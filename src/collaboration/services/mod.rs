//! Application services for collaborations and their elements.

mod elements;
mod lifecycle;
mod views;

pub use elements::{
    ElementService, ElementServiceError, ElementServiceResult, MilestoneInput, TaskInput,
    ToggleOutcome,
};
pub use lifecycle::{
    CollaborationRequest, CollaborationService, CollaborationServiceError,
    CollaborationServiceResult,
};
pub use views::{CollaborationSummary, ElementListView, ElementView};
