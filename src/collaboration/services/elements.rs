//! Element workflows: creating, editing, reordering, and completing.
//!
//! Every operation resolves the collaboration by slug, gates the actor on
//! active membership in the owning group, then runs load, mutate, store
//! against the element sequence. A store rejected for a stale revision is
//! retried against a fresh load, so concurrent writers never overwrite each
//! other's elements. Mutating operations return the freshly recomputed
//! [`ElementListView`] so callers can re-render without a second read.

use super::views::ElementListView;
use crate::collaboration::{
    domain::{
        Collaboration, CollaborationDomainError, CollaborationId, Element, ElementId,
        ElementSequence, Milestone, MoveOutcome, Task, ToggleAction,
    },
    ports::{
        AttachmentError, AttachmentStore, AttachmentUpload, CollaborationRepository,
        CollaborationRepositoryError, ElementStore,
    },
};
use crate::group::domain::{GroupId, Slug, UserId};
use crate::group::ports::{GateError, MembershipGate};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on load-mutate-store attempts before a stale store surfaces
/// as an error.
const MAX_STORE_ATTEMPTS: usize = 3;

/// Request payload for creating or updating a task element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Assigned member, if any.
    pub assigned_to: Option<UserId>,
    /// Whether completion should prompt for notes and a file.
    pub prompt_for_details: bool,
}

/// Request payload for creating or updating a milestone element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneInput {
    /// Display name.
    pub name: String,
    /// Target date.
    pub target_date: NaiveDate,
}

/// Outcome of a one-click task toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The task is now completed.
    Completed {
        /// Whether the caller should follow up with a details prompt.
        prompt_for_details: bool,
    },
    /// The task is open again; the completion payload was discarded.
    Reopened,
    /// The action string was missing or unrecognised; nothing changed.
    Ignored,
}

/// Errors returned by element workflows.
#[derive(Debug, Clone, Error)]
pub enum ElementServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CollaborationDomainError),

    /// The requesting user lacks active membership in the owning group.
    #[error("forbidden")]
    Forbidden,

    /// The owning group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// No live collaboration carries the slug.
    #[error("unknown collaboration slug: {0}")]
    UnknownSlug(String),

    /// The element is not part of the collaboration.
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),

    /// Attachment storage failed.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CollaborationRepositoryError),
}

impl From<GateError> for ElementServiceError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::GroupNotFound(group) => Self::GroupNotFound(group),
            GateError::Persistence(source) => {
                Self::Repository(CollaborationRepositoryError::Persistence(source))
            }
        }
    }
}

/// Result type for element workflows.
pub type ElementServiceResult<T> = Result<T, ElementServiceError>;

/// Element orchestration service.
#[derive(Clone)]
pub struct ElementService<R, E, G, A, C>
where
    R: CollaborationRepository,
    E: ElementStore,
    G: MembershipGate,
    A: AttachmentStore,
    C: Clock + Send + Sync,
{
    collaborations: Arc<R>,
    elements: Arc<E>,
    gate: Arc<G>,
    attachments: Arc<A>,
    clock: Arc<C>,
}

impl<R, E, G, A, C> ElementService<R, E, G, A, C>
where
    R: CollaborationRepository,
    E: ElementStore,
    G: MembershipGate,
    A: AttachmentStore,
    C: Clock + Send + Sync,
{
    /// Creates a new element service.
    #[must_use]
    pub const fn new(
        collaborations: Arc<R>,
        elements: Arc<E>,
        gate: Arc<G>,
        attachments: Arc<A>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            collaborations,
            elements,
            gate,
            attachments,
            clock,
        }
    }

    /// Returns the collaboration's element list, ascending by position.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::Forbidden`] for non-members, or
    /// lookup/repository errors.
    pub async fn list(
        &self,
        actor: UserId,
        slug: &Slug,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let (sequence, _revision) = self.elements.load_sequence(collaboration.id()).await?;
        Ok(ElementListView::assemble(&collaboration, &sequence))
    }

    /// Appends a new task at the end of the sequence and returns the
    /// refreshed element list.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::Forbidden`] for non-members, or
    /// validation/repository errors.
    pub async fn create_task(
        &self,
        actor: UserId,
        slug: &Slug,
        input: TaskInput,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let task = Task::new(
            input.name,
            input.description,
            input.assigned_to,
            input.prompt_for_details,
        )?;
        let element = Element::new_task(task, &*self.clock);
        let id = element.id();
        let (_, sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                sequence.append(element.clone());
                Ok(((), true))
            })
            .await?;
        info!(collaboration = %collaboration.id(), element = %id, "task created");
        Ok(ElementListView::assemble(&collaboration, &sequence))
    }

    /// Appends a new milestone at the end of the sequence and returns the
    /// refreshed element list.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::Forbidden`] for non-members, or
    /// validation/repository errors.
    pub async fn create_milestone(
        &self,
        actor: UserId,
        slug: &Slug,
        input: MilestoneInput,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let milestone = Milestone::new(input.name, input.target_date)?;
        let element = Element::new_milestone(milestone, &*self.clock);
        let id = element.id();
        let (_, sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                sequence.append(element.clone());
                Ok(((), true))
            })
            .await?;
        info!(collaboration = %collaboration.id(), element = %id, "milestone created");
        Ok(ElementListView::assemble(&collaboration, &sequence))
    }

    /// Updates a task's editable fields. Completion state is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::ElementNotFound`] when the element is
    /// absent, [`CollaborationDomainError::NotATask`] when it is a
    /// milestone, or gate/validation/repository errors.
    pub async fn update_task(
        &self,
        actor: UserId,
        slug: &Slug,
        element: ElementId,
        input: TaskInput,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let clock = &*self.clock;
        let (_, sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                let entry = sequence
                    .find_mut(element)
                    .ok_or(ElementServiceError::ElementNotFound(element))?;
                let task = entry
                    .as_task_mut()
                    .ok_or(CollaborationDomainError::NotATask(element))?;
                task.update(
                    input.name.clone(),
                    input.description.clone(),
                    input.assigned_to,
                    input.prompt_for_details,
                )?;
                entry.touch(clock);
                Ok(((), true))
            })
            .await?;
        Ok(ElementListView::assemble(&collaboration, &sequence))
    }

    /// Updates a milestone's editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::ElementNotFound`] when the element is
    /// absent, or gate/validation/repository errors.
    pub async fn update_milestone(
        &self,
        actor: UserId,
        slug: &Slug,
        element: ElementId,
        input: MilestoneInput,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let clock = &*self.clock;
        let (_, sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                let entry = sequence
                    .find_mut(element)
                    .ok_or(ElementServiceError::ElementNotFound(element))?;
                let milestone = entry
                    .as_milestone_mut()
                    .ok_or(CollaborationDomainError::NotAMilestone(element))?;
                milestone.update(input.name.clone(), input.target_date)?;
                entry.touch(clock);
                Ok(((), true))
            })
            .await?;
        Ok(ElementListView::assemble(&collaboration, &sequence))
    }

    /// Applies a one-click completion toggle to a task.
    ///
    /// A missing or unrecognised action yields [`ToggleOutcome::Ignored`]
    /// with no mutation, so a stale or mangled request degrades to a
    /// refresh. Completing an already-completed task refreshes its
    /// completion and deletes the superseded attachment file; undoing
    /// discards the whole completion payload and deletes the stored
    /// attachment file.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::NotATask`] when the element is a
    /// milestone, or gate/lookup/repository errors.
    pub async fn toggle_task(
        &self,
        actor: UserId,
        slug: &Slug,
        element: ElementId,
        action: Option<ToggleAction>,
    ) -> ElementServiceResult<(ToggleOutcome, ElementListView)> {
        let collaboration = self.resolve(actor, slug).await?;
        let Some(action) = action else {
            debug!(collaboration = %collaboration.id(), %element, "toggle without action ignored");
            let (sequence, _revision) = self.elements.load_sequence(collaboration.id()).await?;
            let view = ElementListView::assemble(&collaboration, &sequence);
            return Ok((ToggleOutcome::Ignored, view));
        };
        let clock = &*self.clock;
        let ((outcome, stale_attachment), sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                let entry = sequence
                    .find_mut(element)
                    .ok_or(ElementServiceError::ElementNotFound(element))?;
                let task = entry
                    .as_task_mut()
                    .ok_or(CollaborationDomainError::NotATask(element))?;
                // Both transitions drop any earlier completion payload, so
                // the file it referenced becomes unreachable.
                let stale = task
                    .completion()
                    .and_then(|completion| completion.attachment().map(str::to_owned));
                let outcome = match action {
                    ToggleAction::Complete => {
                        task.complete(actor, clock);
                        let prompt_for_details = task.prompt_for_details();
                        ToggleOutcome::Completed { prompt_for_details }
                    }
                    ToggleAction::Undo => {
                        task.reopen();
                        ToggleOutcome::Reopened
                    }
                };
                entry.touch(clock);
                Ok(((outcome, stale), true))
            })
            .await?;
        self.discard_attachment(stale_attachment).await;
        info!(collaboration = %collaboration.id(), %element, ?outcome, "task toggled");
        Ok((outcome, ElementListView::assemble(&collaboration, &sequence)))
    }

    /// Records completion notes and an optional file on a completed task.
    ///
    /// The upload is saved before the sequence write; if the write then
    /// fails for any reason the saved file is removed again, so error paths
    /// leave no orphaned attachment behind. A successfully replaced earlier
    /// attachment file is removed as well.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::DetailsOnOpenTask`] when the task
    /// is not completed, or gate/attachment/repository errors.
    pub async fn complete_details(
        &self,
        actor: UserId,
        slug: &Slug,
        element: ElementId,
        notes: Option<String>,
        upload: Option<AttachmentUpload>,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let attachment = match upload {
            Some(upload) => Some(self.attachments.save(upload).await?),
            None => None,
        };
        let clock = &*self.clock;
        let stored = attachment.clone();
        let result = self
            .mutate_sequence(collaboration.id(), |sequence| {
                let entry = sequence
                    .find_mut(element)
                    .ok_or(ElementServiceError::ElementNotFound(element))?;
                let task = entry
                    .as_task_mut()
                    .ok_or(CollaborationDomainError::NotATask(element))?;
                let replaced = task
                    .completion()
                    .and_then(|completion| completion.attachment().map(str::to_owned));
                task.record_details(notes.clone(), attachment.clone())?;
                entry.touch(clock);
                Ok((replaced, true))
            })
            .await;
        match result {
            Ok((replaced, sequence)) => {
                if replaced != stored {
                    self.discard_attachment(replaced).await;
                }
                Ok(ElementListView::assemble(&collaboration, &sequence))
            }
            Err(err) => {
                self.discard_attachment(stored).await;
                Err(err)
            }
        }
    }

    /// Moves an element to a new position and returns the refreshed element
    /// list.
    ///
    /// An out-of-range target is a silent no-op: stale indices from an
    /// outdated client view must not corrupt the sequence or surface as
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::ElementNotFound`] when the element is
    /// absent, or gate/repository errors.
    pub async fn move_element(
        &self,
        actor: UserId,
        slug: &Slug,
        element: ElementId,
        target: usize,
    ) -> ElementServiceResult<(MoveOutcome, ElementListView)> {
        let collaboration = self.resolve(actor, slug).await?;
        let (outcome, sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                let outcome = sequence
                    .move_element(element, target)
                    .map_err(|_| ElementServiceError::ElementNotFound(element))?;
                Ok((outcome, matches!(outcome, MoveOutcome::Moved)))
            })
            .await?;
        match outcome {
            MoveOutcome::Moved => {
                info!(collaboration = %collaboration.id(), %element, target, "element moved");
            }
            MoveOutcome::Unchanged => {}
            MoveOutcome::OutOfRange => {
                debug!(
                    collaboration = %collaboration.id(),
                    %element,
                    target,
                    len = sequence.len(),
                    "out-of-range move ignored"
                );
            }
        }
        Ok((outcome, ElementListView::assemble(&collaboration, &sequence)))
    }

    /// Deletes an element, closing the position gap it leaves, and returns
    /// the refreshed element list.
    ///
    /// A completed task's attachment file is removed along with the row.
    ///
    /// # Errors
    ///
    /// Returns [`ElementServiceError::ElementNotFound`] when the element is
    /// absent, or gate/repository errors.
    pub async fn delete_element(
        &self,
        actor: UserId,
        slug: &Slug,
        element: ElementId,
    ) -> ElementServiceResult<ElementListView> {
        let collaboration = self.resolve(actor, slug).await?;
        let (removed, sequence) = self
            .mutate_sequence(collaboration.id(), |sequence| {
                let removed = sequence
                    .remove(element)
                    .map_err(|_| ElementServiceError::ElementNotFound(element))?;
                Ok((removed, true))
            })
            .await?;
        let stale = removed.as_task().and_then(|task| {
            task.completion()
                .and_then(|completion| completion.attachment().map(str::to_owned))
        });
        self.discard_attachment(stale).await;
        info!(collaboration = %collaboration.id(), %element, "element deleted");
        Ok(ElementListView::assemble(&collaboration, &sequence))
    }

    async fn resolve(
        &self,
        actor: UserId,
        slug: &Slug,
    ) -> ElementServiceResult<Collaboration> {
        let collaboration = self
            .collaborations
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| ElementServiceError::UnknownSlug(slug.to_string()))?;
        if !self
            .gate
            .level_for(actor, collaboration.group())
            .await?
            .is_member()
        {
            return Err(ElementServiceError::Forbidden);
        }
        Ok(collaboration)
    }

    /// Runs one load-mutate-store cycle, reapplying the mutation against a
    /// fresh load whenever the store reports a stale revision.
    ///
    /// The closure returns its result and whether the sequence changed; an
    /// unchanged sequence skips the store entirely. Closures must therefore
    /// be safe to rerun, which holds here because each one rebuilds its
    /// mutation from the loaded sequence alone.
    async fn mutate_sequence<T, F>(
        &self,
        collaboration: CollaborationId,
        mut apply: F,
    ) -> ElementServiceResult<(T, ElementSequence)>
    where
        F: FnMut(&mut ElementSequence) -> ElementServiceResult<(T, bool)> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            let (mut sequence, revision) = self.elements.load_sequence(collaboration).await?;
            let (value, changed) = apply(&mut sequence)?;
            if !changed {
                return Ok((value, sequence));
            }
            match self
                .elements
                .store_sequence(collaboration, &sequence, revision)
                .await
            {
                Ok(()) => return Ok((value, sequence)),
                Err(CollaborationRepositoryError::StaleSequence(_))
                    if attempt < MAX_STORE_ATTEMPTS =>
                {
                    debug!(%collaboration, attempt, "stale sequence store, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Deletes a no-longer-referenced attachment file. The sequence write
    /// already succeeded, so a failing removal is logged, not propagated.
    async fn discard_attachment(&self, path: Option<String>) {
        let Some(path) = path else {
            return;
        };
        if let Err(err) = self.attachments.remove(&path).await {
            warn!(%path, error = %err, "stale attachment not removed");
        }
    }
}
