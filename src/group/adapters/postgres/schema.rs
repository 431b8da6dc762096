//! Diesel schema for group and membership persistence.

diesel::table! {
    /// Group records.
    groups (id) {
        /// Group identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Unique URL slug.
        #[max_length = 255]
        slug -> Varchar,
        /// Creator reference; null once the user record is deleted.
        created_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows, unique per (user, group) pair.
    memberships (id) {
        /// Membership identifier.
        id -> Uuid,
        /// Member's user identifier.
        user_id -> Uuid,
        /// Group identifier.
        group_id -> Uuid,
        /// Membership status.
        #[max_length = 50]
        status -> Varchar,
        /// Email subscription flag.
        subscribed -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(memberships -> groups (group_id));
diesel::allow_tables_to_appear_in_same_query!(groups, memberships);
