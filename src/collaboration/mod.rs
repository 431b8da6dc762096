//! Collaborations and their ordered element sequence.
//!
//! A collaboration is a group-owned project backed by one position-ordered,
//! user-reorderable sequence of heterogeneous elements (tasks and
//! milestones). This module carries the crate's core design content: the
//! dense-position allocator and reorder logic, the element aggregator, and
//! the task completion state machine. The module follows hexagonal
//! architecture:
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
