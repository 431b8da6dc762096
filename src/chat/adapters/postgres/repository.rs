//! `PostgreSQL` repository implementation for chat message storage.

use super::{
    models::{MessageRow, NewMessageRow},
    schema::messages,
};
use crate::chat::{
    domain::{Message, MessageId, MessageScope, PersistedMessageData},
    ports::{ChatRepositoryError, ChatRepositoryResult, MessageRepository},
};
use crate::collaboration::domain::CollaborationId;
use crate::group::domain::{GroupId, UserId, UserRef};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by chat adapters.
pub type ChatPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed message repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: ChatPgPool,
}

async fn run_blocking<F, T>(pool: &ChatPgPool, f: F) -> ChatRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> ChatRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(ChatRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(ChatRepositoryError::persistence)?
}

impl PostgresMessageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ChatPgPool) -> Self {
        Self { pool }
    }
}

fn to_message_row(message: &Message) -> NewMessageRow {
    let (group_id, collaboration_id) = match message.scope() {
        MessageScope::Group { group } => (Some(group.into_inner()), None),
        MessageScope::Collaboration { collaboration } => {
            (None, Some(collaboration.into_inner()))
        }
    };
    NewMessageRow {
        id: message.id().into_inner(),
        group_id,
        collaboration_id,
        author: message.author().user_id().map(UserId::into_inner),
        body: message.body().to_owned(),
        created_at: message.created_at(),
    }
}

fn row_to_message(row: MessageRow) -> ChatRepositoryResult<Message> {
    let scope = match (row.group_id, row.collaboration_id) {
        (Some(group), None) => MessageScope::Group {
            group: GroupId::from_uuid(group),
        },
        (None, Some(collaboration)) => MessageScope::Collaboration {
            collaboration: CollaborationId::from_uuid(collaboration),
        },
        _ => {
            return Err(ChatRepositoryError::persistence(std::io::Error::other(
                format!("message {} has an ambiguous scope", row.id),
            )));
        }
    };
    Ok(Message::from_persisted(PersistedMessageData {
        id: MessageId::from_uuid(row.id),
        scope,
        author: row.author.map_or_else(UserRef::detached, |id| {
            UserRef::to_user(UserId::from_uuid(id))
        }),
        body: row.body,
        created_at: row.created_at,
    }))
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn store(&self, message: &Message) -> ChatRepositoryResult<()> {
        let new_row = to_message_row(message);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(messages::table)
                .values(&new_row)
                .execute(connection)
                .map_err(ChatRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_by_scope(&self, scope: MessageScope) -> ChatRepositoryResult<Vec<Message>> {
        run_blocking(&self.pool, move |connection| {
            let query = messages::table
                .order(messages::created_at.desc())
                .select(MessageRow::as_select())
                .into_boxed();
            let query = match scope {
                MessageScope::Group { group } => {
                    query.filter(messages::group_id.eq(group.into_inner()))
                }
                MessageScope::Collaboration { collaboration } => {
                    query.filter(messages::collaboration_id.eq(collaboration.into_inner()))
                }
            };
            let rows = query
                .load::<MessageRow>(connection)
                .map_err(ChatRepositoryError::persistence)?;
            rows.into_iter().map(row_to_message).collect()
        })
        .await
    }
}
