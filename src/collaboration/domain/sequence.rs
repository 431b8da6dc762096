//! Dense-position element sequence.
//!
//! One collaboration owns one `ElementSequence`. An element's position is
//! its index in the backing vector, so the dense-position invariant, that
//! positions form exactly `[0, len)` with no duplicates and no gaps, holds
//! structurally after every operation. Persistence round-trips through
//! explicit `(position, element)` pairs and re-validates density on load.

use super::{CollaborationDomainError, Element, ElementId};

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The element now occupies the target position; intervening elements
    /// shifted one step toward the vacated slot.
    Moved,
    /// The target equals the element's current position; nothing changed.
    Unchanged,
    /// The target lies outside `[0, len)`; nothing changed. Out-of-range
    /// targets are tolerated so stale client-side indices stay harmless.
    OutOfRange,
}

/// Position-ordered sequence of a collaboration's elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSequence {
    elements: Vec<Element>,
}

impl ElementSequence {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Rebuilds a sequence from persisted `(position, element)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::DuplicatePosition`] or
    /// [`CollaborationDomainError::PositionGap`] when the stored positions
    /// are not exactly the dense range `[0, len)`. A violated invariant is
    /// surfaced rather than silently reordered.
    pub fn from_persisted(
        mut rows: Vec<(usize, Element)>,
    ) -> Result<Self, CollaborationDomainError> {
        rows.sort_by_key(|(position, _)| *position);
        let mut elements = Vec::with_capacity(rows.len());
        for (expected, (found, element)) in rows.into_iter().enumerate() {
            if found < expected {
                return Err(CollaborationDomainError::DuplicatePosition { position: found });
            }
            if found > expected {
                return Err(CollaborationDomainError::PositionGap { expected, found });
            }
            elements.push(element);
        }
        Ok(Self { elements })
    }

    /// Returns the number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` when the sequence holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates elements ascending by position.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Returns the position of an element, if present.
    #[must_use]
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id() == id)
    }

    /// Returns the element with the given identifier, if present.
    #[must_use]
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }

    /// Returns a mutable reference to the element, if present.
    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id() == id)
    }

    /// Appends an element at the end of the sequence.
    ///
    /// The new element takes position `len` (the old count); existing
    /// positions are untouched.
    pub fn append(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Moves an element to the target position.
    ///
    /// Every element between the vacated slot and the target shifts one
    /// step in the opposite direction of the move; density is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::UnknownElement`] when the
    /// element is not part of this sequence.
    pub fn move_element(
        &mut self,
        id: ElementId,
        target: usize,
    ) -> Result<MoveOutcome, CollaborationDomainError> {
        let current = self
            .position_of(id)
            .ok_or(CollaborationDomainError::UnknownElement(id))?;
        if target >= self.elements.len() {
            return Ok(MoveOutcome::OutOfRange);
        }
        if target == current {
            return Ok(MoveOutcome::Unchanged);
        }
        let element = self.elements.remove(current);
        self.elements.insert(target, element);
        Ok(MoveOutcome::Moved)
    }

    /// Removes an element, closing the position gap it leaves.
    ///
    /// Every element with a higher position shifts down by one.
    ///
    /// # Errors
    ///
    /// Returns [`CollaborationDomainError::UnknownElement`] when the
    /// element is not part of this sequence.
    pub fn remove(&mut self, id: ElementId) -> Result<Element, CollaborationDomainError> {
        let position = self
            .position_of(id)
            .ok_or(CollaborationDomainError::UnknownElement(id))?;
        Ok(self.elements.remove(position))
    }

    /// Counts task elements and completed task elements.
    ///
    /// Used to derive collaboration status; milestones are not counted.
    #[must_use]
    pub fn task_progress(&self) -> (usize, usize) {
        let mut total = 0_usize;
        let mut completed = 0_usize;
        for element in &self.elements {
            if let Some(task) = element.as_task() {
                total = total.saturating_add(1);
                if task.is_completed() {
                    completed = completed.saturating_add(1);
                }
            }
        }
        (total, completed)
    }
}

impl<'a> IntoIterator for &'a ElementSequence {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
