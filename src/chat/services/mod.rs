//! Application services for chat boards.

mod board;

pub use board::{BoardService, BoardServiceError, BoardServiceResult};
