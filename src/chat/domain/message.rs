//! Chat message aggregate.

use super::MessageId;
use crate::collaboration::domain::CollaborationId;
use crate::group::domain::{GroupId, UserRef};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while constructing chat domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// The message body is empty after trimming.
    #[error("message body must not be empty")]
    EmptyBody,
}

/// The board a message belongs to.
///
/// The two scopes are mutually exclusive: a message sits on a group's
/// board or on a collaboration's board, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum MessageScope {
    /// The group-level board.
    Group {
        /// Owning group.
        group: GroupId,
    },
    /// A collaboration's board.
    Collaboration {
        /// Owning collaboration.
        collaboration: CollaborationId,
    },
}

/// One message on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    scope: MessageScope,
    author: UserRef,
    body: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Persisted scope.
    pub scope: MessageScope,
    /// Persisted author reference.
    pub author: UserRef,
    /// Persisted body text.
    pub body: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a new message posted now.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyBody`] when the body is blank.
    pub fn post(
        scope: MessageScope,
        author: UserRef,
        body: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ChatDomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ChatDomainError::EmptyBody);
        }
        Ok(Self {
            id: MessageId::new(),
            scope,
            author,
            body,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            scope: data.scope,
            author: data.author,
            body: data.body,
            created_at: data.created_at,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the board scope.
    #[must_use]
    pub const fn scope(&self) -> MessageScope {
        self.scope
    }

    /// Returns the author reference.
    #[must_use]
    pub const fn author(&self) -> UserRef {
        self.author
    }

    /// Returns the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
