//! Attachment storage port for task completion files.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// An uploaded file accompanying a task completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// Client-supplied file name; sanitised by the store.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Stores completion attachments and hands back stable relative paths.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Saves an upload and returns the relative path to persist on the task.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError`] when the file cannot be written.
    async fn save(&self, upload: AttachmentUpload) -> Result<String, AttachmentError>;

    /// Removes a previously saved attachment. Missing files are tolerated;
    /// the undo transition must not fail because a file already vanished.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError`] when removal fails for another reason.
    async fn remove(&self, path: &str) -> Result<(), AttachmentError>;
}

/// Errors returned by attachment store implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentError {
    /// The file name is empty or escapes the storage directory.
    #[error("invalid attachment file name: {0}")]
    InvalidFileName(String),

    /// Filesystem failure.
    #[error("attachment storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
