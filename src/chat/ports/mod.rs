//! Port contracts for chat boards.

mod repository;
mod resolver;

pub use repository::{ChatRepositoryError, ChatRepositoryResult, MessageRepository};
pub use resolver::{ScopeError, ScopeResolver};
