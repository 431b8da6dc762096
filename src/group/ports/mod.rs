//! Port contracts for groups and memberships.
//!
//! Ports define infrastructure-agnostic interfaces used by group services
//! and by the other modules that gate mutations on membership level.

pub mod gate;
pub mod repository;

pub use gate::{GateError, MembershipGate};
pub use repository::{
    GroupRepository, GroupRepositoryError, GroupRepositoryResult, MembershipRepository,
};
