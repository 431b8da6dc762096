//! Diesel schema for collaboration and element persistence.

diesel::table! {
    /// Collaboration records; soft-deleted rows keep their slug reserved.
    collaborations (id) {
        /// Collaboration identifier.
        id -> Uuid,
        /// Owning group identifier.
        group_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Unique URL slug.
        #[max_length = 255]
        slug -> Varchar,
        /// Stored image path, if any.
        #[max_length = 255]
        image -> Nullable<Varchar>,
        /// Creator reference; null once the user record is deleted.
        created_by -> Nullable<Uuid>,
        /// Denormalised element count; rewritten with each sequence store.
        number_of_elements -> Int4,
        /// Element sequence revision; bumped with each sequence store.
        elements_revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete timestamp, if any.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Element rows; positions are dense per collaboration.
    elements (id) {
        /// Element identifier.
        id -> Uuid,
        /// Owning collaboration identifier.
        collaboration_id -> Uuid,
        /// Zero-based position within the collaboration.
        position -> Int4,
        /// Payload kind discriminant.
        #[max_length = 50]
        kind -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text description; empty for milestones.
        description -> Text,
        /// Assigned member, tasks only.
        assigned_to -> Nullable<Uuid>,
        /// Whether completion should prompt for notes and a file.
        prompt_for_details -> Bool,
        /// Completion timestamp; null while the task is open.
        completed_at -> Nullable<Timestamptz>,
        /// Completing user; null for open tasks or deleted users.
        completed_by -> Nullable<Uuid>,
        /// Completion notes, if recorded.
        completion_notes -> Nullable<Text>,
        /// Completion attachment path, if any.
        #[max_length = 255]
        attachment -> Nullable<Varchar>,
        /// Milestone target date.
        target_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(elements -> collaborations (collaboration_id));
diesel::allow_tables_to_appear_in_same_query!(collaborations, elements);
