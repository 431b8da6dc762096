//! In-memory repositories for collaboration tests.

mod collaborations;
mod elements;

pub use collaborations::InMemoryCollaborationRepository;
pub use elements::InMemoryElementStore;
