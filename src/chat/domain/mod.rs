//! Domain model for chat boards.

mod ids;
mod message;

pub use ids::MessageId;
pub use message::{ChatDomainError, Message, MessageScope, PersistedMessageData};
