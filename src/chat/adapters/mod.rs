//! Persistence adapters for the chat module.
//!
//! - [`memory`]: thread-safe in-memory repositories for tests
//! - [`postgres`]: Diesel-backed `PostgreSQL` repositories
//! - [`resolver`]: scope resolution over the collaboration store

pub mod memory;
pub mod postgres;
pub mod resolver;
