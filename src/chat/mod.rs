//! Message boards attached to groups and collaborations.
//!
//! Every group and every collaboration carries one board. A message
//! belongs to exactly one of the two scopes; posting and reading require
//! active membership in the scope's owning group. The module follows the
//! same hexagonal layout as its siblings:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
