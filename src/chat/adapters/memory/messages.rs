//! In-memory message repository.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::chat::{
    domain::{Message, MessageScope},
    ports::{ChatRepositoryError, ChatRepositoryResult, MessageRepository},
};

/// Thread-safe in-memory message repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    state: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ChatRepositoryError {
    ChatRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store(&self, message: &Message) -> ChatRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.push(message.clone());
        Ok(())
    }

    async fn find_by_scope(&self, scope: MessageScope) -> ChatRepositoryResult<Vec<Message>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut rows: Vec<Message> = state
            .iter()
            .filter(|row| row.scope() == scope)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(rows)
    }
}
