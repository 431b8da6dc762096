//! In-memory repositories for group and membership tests.

mod group;
mod membership;

pub use group::InMemoryGroupRepository;
pub use membership::InMemoryMembershipRepository;
