//! `PostgreSQL` adapters for group and membership persistence.

mod models;
mod repository;
mod schema;

pub use repository::{GroupPgPool, PostgresGroupRepository, PostgresMembershipRepository};
