//! Diesel schema for chat message persistence.

diesel::table! {
    /// Message rows; exactly one of the two scope columns is set.
    messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Owning group for group-scoped boards.
        group_id -> Nullable<Uuid>,
        /// Owning collaboration for collaboration-scoped boards.
        collaboration_id -> Nullable<Uuid>,
        /// Author reference; null once the user record is deleted.
        author -> Nullable<Uuid>,
        /// Message body.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
