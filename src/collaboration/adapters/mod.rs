//! Persistence and storage adapters for the collaboration module.
//!
//! - [`memory`]: thread-safe in-memory repositories for tests
//! - [`postgres`]: Diesel-backed `PostgreSQL` repositories
//! - [`attachments`]: capability-scoped filesystem attachment store

pub mod attachments;
pub mod memory;
pub mod postgres;
