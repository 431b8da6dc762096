//! Diesel row models for group and membership persistence.

use super::schema::{groups, memberships};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for group records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    /// Group identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// URL slug.
    pub slug: String,
    /// Creator reference.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for group records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
pub struct NewGroupRow {
    /// Group identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// URL slug.
    pub slug: String,
    /// Creator reference.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for membership records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = memberships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    /// Membership identifier.
    pub id: uuid::Uuid,
    /// Member's user identifier.
    pub user_id: uuid::Uuid,
    /// Group identifier.
    pub group_id: uuid::Uuid,
    /// Status.
    pub status: String,
    /// Subscription flag.
    pub subscribed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for membership records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = memberships)]
pub struct NewMembershipRow {
    /// Membership identifier.
    pub id: uuid::Uuid,
    /// Member's user identifier.
    pub user_id: uuid::Uuid,
    /// Group identifier.
    pub group_id: uuid::Uuid,
    /// Status.
    pub status: String,
    /// Subscription flag.
    pub subscribed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
