//! `PostgreSQL` adapters for chat message persistence.

mod models;
mod repository;
mod schema;

pub use repository::{ChatPgPool, PostgresMessageRepository};
