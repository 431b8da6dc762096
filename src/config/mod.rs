//! Environment-driven infrastructure configuration.
//!
//! The crate itself never reads the environment at use sites; callers
//! build the configuration once at startup and hand the resulting pool
//! and directory handles to the adapters.

mod settings;

pub use settings::{ConfigError, DatabaseConfig, MediaConfig, PgPool};

#[cfg(test)]
mod tests;
