//! In-memory repositories for chat tests.

mod messages;

pub use messages::InMemoryMessageRepository;
