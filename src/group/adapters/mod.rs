//! Persistence adapters for the group module.
//!
//! - [`memory`]: thread-safe in-memory repositories for tests
//! - [`postgres`]: Diesel-backed `PostgreSQL` repositories

pub mod memory;
pub mod postgres;
