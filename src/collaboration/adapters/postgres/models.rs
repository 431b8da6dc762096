//! Diesel row models for collaboration and element persistence.

use super::schema::{collaborations, elements};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for collaboration records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collaborations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CollaborationRow {
    /// Collaboration identifier.
    pub id: uuid::Uuid,
    /// Owning group identifier.
    pub group_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// URL slug.
    pub slug: String,
    /// Image path.
    pub image: Option<String>,
    /// Creator reference.
    pub created_by: Option<uuid::Uuid>,
    /// Denormalised element count.
    pub number_of_elements: i32,
    /// Element sequence revision.
    pub elements_revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert model for collaboration records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collaborations)]
pub struct NewCollaborationRow {
    /// Collaboration identifier.
    pub id: uuid::Uuid,
    /// Owning group identifier.
    pub group_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// URL slug.
    pub slug: String,
    /// Image path.
    pub image: Option<String>,
    /// Creator reference.
    pub created_by: Option<uuid::Uuid>,
    /// Denormalised element count.
    pub number_of_elements: i32,
    /// Element sequence revision.
    pub elements_revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Query result row for element records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = elements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ElementRow {
    /// Element identifier.
    pub id: uuid::Uuid,
    /// Owning collaboration identifier.
    pub collaboration_id: uuid::Uuid,
    /// Zero-based position.
    pub position: i32,
    /// Payload kind discriminant.
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Assigned member.
    pub assigned_to: Option<uuid::Uuid>,
    /// Prompt-for-details flag.
    pub prompt_for_details: bool,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completing user.
    pub completed_by: Option<uuid::Uuid>,
    /// Completion notes.
    pub completion_notes: Option<String>,
    /// Completion attachment path.
    pub attachment: Option<String>,
    /// Milestone target date.
    pub target_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for element records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = elements)]
pub struct NewElementRow {
    /// Element identifier.
    pub id: uuid::Uuid,
    /// Owning collaboration identifier.
    pub collaboration_id: uuid::Uuid,
    /// Zero-based position.
    pub position: i32,
    /// Payload kind discriminant.
    pub kind: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Assigned member.
    pub assigned_to: Option<uuid::Uuid>,
    /// Prompt-for-details flag.
    pub prompt_for_details: bool,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completing user.
    pub completed_by: Option<uuid::Uuid>,
    /// Completion notes.
    pub completion_notes: Option<String>,
    /// Completion attachment path.
    pub attachment: Option<String>,
    /// Milestone target date.
    pub target_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
