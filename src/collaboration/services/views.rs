//! Serializable views assembled from collaboration state.
//!
//! Views flatten the element sequence into plain rows with explicit
//! positions, ready for template rendering or JSON responses.

use crate::collaboration::domain::{
    Collaboration, CollaborationStatus, Element, ElementBody, ElementKind, ElementSequence,
};
use crate::group::domain::{GroupId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// One rendered row of a collaboration's element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementView {
    /// Element identifier, as a string for template use.
    pub id: String,
    /// Zero-based position in the sequence.
    pub position: usize,
    /// Payload kind.
    pub kind: ElementKind,
    /// Display name.
    pub name: String,
    /// Description; empty for milestones.
    pub description: String,
    /// Assigned member, tasks only.
    pub assigned_to: Option<UserId>,
    /// Whether completing this task should prompt for details.
    pub prompt_for_details: bool,
    /// Whether the task is completed; always `false` for milestones.
    pub completed: bool,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completing user, resolved to the sentinel placeholder when the
    /// account is gone; `None` for open tasks.
    pub completed_by: Option<UserId>,
    /// Completion notes.
    pub completion_notes: Option<String>,
    /// Completion attachment path.
    pub attachment: Option<String>,
    /// Milestone target date.
    pub target_date: Option<NaiveDate>,
}

impl ElementView {
    /// Builds a view row from a positioned element.
    #[must_use]
    pub fn from_element(position: usize, element: &Element) -> Self {
        let mut view = Self {
            id: element.id().to_string(),
            position,
            kind: element.kind(),
            name: element.name().to_owned(),
            description: String::new(),
            assigned_to: None,
            prompt_for_details: false,
            completed: false,
            completed_at: None,
            completed_by: None,
            completion_notes: None,
            attachment: None,
            target_date: None,
        };
        match element.body() {
            ElementBody::Task(task) => {
                view.description = task.description().to_owned();
                view.assigned_to = task.assigned_to();
                view.prompt_for_details = task.prompt_for_details();
                if let Some(completion) = task.completion() {
                    view.completed = true;
                    view.completed_at = Some(completion.completed_at());
                    view.completed_by = Some(completion.completed_by().resolve());
                    view.completion_notes = completion.notes().map(str::to_owned);
                    view.attachment = completion.attachment().map(str::to_owned);
                }
            }
            ElementBody::Milestone(milestone) => {
                view.target_date = Some(milestone.target_date());
            }
        }
        view
    }
}

/// The full element list of one collaboration, ascending by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementListView {
    /// Collaboration display name.
    pub name: String,
    /// Collaboration slug.
    pub slug: String,
    /// Collaboration description.
    pub description: String,
    /// Derived lifecycle status.
    pub status: CollaborationStatus,
    /// Number of task elements.
    pub task_total: usize,
    /// Number of completed task elements.
    pub task_completed: usize,
    /// Element rows, ascending by position.
    pub elements: Vec<ElementView>,
}

impl ElementListView {
    /// Assembles the list view from a collaboration and its sequence.
    #[must_use]
    pub fn assemble(collaboration: &Collaboration, sequence: &ElementSequence) -> Self {
        let (task_total, task_completed) = sequence.task_progress();
        Self {
            name: collaboration.name().to_owned(),
            slug: collaboration.slug().to_string(),
            description: collaboration.description().to_owned(),
            status: CollaborationStatus::derive(task_total, task_completed),
            task_total,
            task_completed,
            elements: sequence
                .iter()
                .enumerate()
                .map(|(position, element)| ElementView::from_element(position, element))
                .collect(),
        }
    }
}

/// One row of a group's collaboration listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaborationSummary {
    /// Collaboration display name.
    pub name: String,
    /// Collaboration slug.
    pub slug: String,
    /// Collaboration description.
    pub description: String,
    /// Stored image path, if any.
    pub image: Option<String>,
    /// Owning group identifier.
    pub group: GroupId,
    /// Derived lifecycle status.
    pub status: CollaborationStatus,
    /// Number of task elements.
    pub task_total: usize,
    /// Number of completed task elements.
    pub task_completed: usize,
    /// Creation timestamp; listings sort on this, newest first.
    pub created_at: DateTime<Utc>,
}

impl CollaborationSummary {
    /// Builds a summary row from a collaboration and its task progress.
    #[must_use]
    pub fn assemble(collaboration: &Collaboration, sequence: &ElementSequence) -> Self {
        let (task_total, task_completed) = sequence.task_progress();
        Self {
            name: collaboration.name().to_owned(),
            slug: collaboration.slug().to_string(),
            description: collaboration.description().to_owned(),
            image: collaboration.image().map(str::to_owned),
            group: collaboration.group(),
            status: CollaborationStatus::derive(task_total, task_completed),
            task_total,
            task_completed,
            created_at: collaboration.created_at(),
        }
    }
}
