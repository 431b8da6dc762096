//! Collabl: group collaboration platform core.
//!
//! Groups run collaborations (shared projects composed of an ordered,
//! user-reorderable sequence of tasks and milestones) and members chat
//! within groups and collaborations. This crate implements the domain
//! logic behind those features: the dense-position element sequence, the
//! task completion state machine, and the membership permission gate.
//!
//! # Architecture
//!
//! Collabl follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, filesystem)
//! - **Services**: Orchestration, permission gating, transaction boundaries
//!
//! # Modules
//!
//! - [`group`]: Groups, memberships, and the permission gate
//! - [`collaboration`]: Collaborations and their ordered element sequence
//! - [`chat`]: Group and collaboration message boards
//! - [`rendering`]: Partial-page fragment rendering for mutation responses
//! - [`config`]: Environment-driven infrastructure configuration

pub mod chat;
pub mod collaboration;
pub mod config;
pub mod group;
pub mod rendering;
