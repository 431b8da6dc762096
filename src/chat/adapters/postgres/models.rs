//! Diesel row models for chat message persistence.

use super::schema::messages;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for message records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Owning group, if group-scoped.
    pub group_id: Option<uuid::Uuid>,
    /// Owning collaboration, if collaboration-scoped.
    pub collaboration_id: Option<uuid::Uuid>,
    /// Author reference.
    pub author: Option<uuid::Uuid>,
    /// Message body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for message records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Owning group, if group-scoped.
    pub group_id: Option<uuid::Uuid>,
    /// Owning collaboration, if collaboration-scoped.
    pub collaboration_id: Option<uuid::Uuid>,
    /// Author reference.
    pub author: Option<uuid::Uuid>,
    /// Message body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
