//! `PostgreSQL` adapters for collaboration and element persistence.

mod models;
mod repository;
mod schema;

pub use repository::{
    CollaborationPgPool, PostgresCollaborationRepository, PostgresElementStore,
};
