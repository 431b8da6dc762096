//! Groups, memberships, and the permission gate.
//!
//! A group owns collaborations and a message board. Users relate to groups
//! through a single membership row per (user, group) pair whose status
//! drives the closed [`domain::MembershipLevel`] classification used to gate
//! every mutation in the crate. The module follows hexagonal architecture:
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
