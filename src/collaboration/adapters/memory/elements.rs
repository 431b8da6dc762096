//! In-memory element store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::collaboration::{
    domain::{CollaborationId, Element, ElementSequence},
    ports::{
        CollaborationRepositoryError, CollaborationRepositoryResult, ElementStore,
        SequenceRevision,
    },
};

#[derive(Debug, Clone)]
struct SequenceState {
    revision: SequenceRevision,
    elements: Vec<Element>,
}

/// Thread-safe in-memory element store.
///
/// Rows are kept in position order, so the stored vector index doubles as
/// the persisted position. Each store compares the caller's revision under
/// the write guard and rejects a stale one, matching the optimistic check
/// the port demands.
#[derive(Debug, Clone, Default)]
pub struct InMemoryElementStore {
    state: Arc<RwLock<HashMap<CollaborationId, SequenceState>>>,
}

impl InMemoryElementStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> CollaborationRepositoryError {
    CollaborationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ElementStore for InMemoryElementStore {
    async fn load_sequence(
        &self,
        collaboration: CollaborationId,
    ) -> CollaborationRepositoryResult<(ElementSequence, SequenceRevision)> {
        let state = self.state.read().map_err(lock_error)?;
        let (rows, revision) = state.get(&collaboration).map_or_else(
            || (Vec::new(), SequenceRevision::initial()),
            |stored| {
                let rows = stored
                    .elements
                    .iter()
                    .enumerate()
                    .map(|(position, element)| (position, element.clone()))
                    .collect();
                (rows, stored.revision)
            },
        );
        let sequence = ElementSequence::from_persisted(rows)
            .map_err(|err| CollaborationRepositoryError::CorruptSequence(collaboration, err))?;
        Ok((sequence, revision))
    }

    async fn store_sequence(
        &self,
        collaboration: CollaborationId,
        sequence: &ElementSequence,
        expected: SequenceRevision,
    ) -> CollaborationRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let current = state
            .get(&collaboration)
            .map_or_else(SequenceRevision::initial, |stored| stored.revision);
        if current != expected {
            return Err(CollaborationRepositoryError::StaleSequence(collaboration));
        }
        state.insert(
            collaboration,
            SequenceState {
                revision: expected.next(),
                elements: sequence.iter().cloned().collect(),
            },
        );
        Ok(())
    }
}
