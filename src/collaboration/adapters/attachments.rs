//! Capability-scoped filesystem attachment store.
//!
//! Files live under one directory handle opened ahead of time; the store
//! cannot reach outside it, and uploaded file names are sanitised to a
//! single path component before writing.

use crate::collaboration::ports::{AttachmentError, AttachmentStore, AttachmentUpload};
use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::sync::Arc;
use uuid::Uuid;

/// Attachment store writing into a capability-scoped directory.
#[derive(Debug, Clone)]
pub struct DirAttachmentStore {
    dir: Arc<Dir>,
}

impl DirAttachmentStore {
    /// Creates a store over an already-opened directory handle.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }
}

/// Reduces a client-supplied file name to a safe single path component.
///
/// Path separators and parent references are rejected rather than
/// rewritten; a name that survives sanitisation is stored verbatim under
/// a random prefix so repeated uploads never collide.
fn sanitise_file_name(raw: &str) -> Result<&str, AttachmentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AttachmentError::InvalidFileName(raw.to_owned()));
    }
    let is_traversal = trimmed == "." || trimmed == "..";
    if is_traversal || trimmed.contains(['/', '\\']) || trimmed.contains('\0') {
        return Err(AttachmentError::InvalidFileName(raw.to_owned()));
    }
    Ok(trimmed)
}

#[async_trait]
impl AttachmentStore for DirAttachmentStore {
    async fn save(&self, upload: AttachmentUpload) -> Result<String, AttachmentError> {
        let name = sanitise_file_name(&upload.file_name)?;
        let stored = format!("{}-{name}", Uuid::new_v4());
        let dir = Arc::clone(&self.dir);
        let bytes = upload.bytes;
        let path = stored.clone();
        tokio::task::spawn_blocking(move || dir.write(&path, &bytes))
            .await
            .map_err(AttachmentError::storage)?
            .map_err(AttachmentError::storage)?;
        Ok(stored)
    }

    async fn remove(&self, path: &str) -> Result<(), AttachmentError> {
        let name = sanitise_file_name(path)?.to_owned();
        let dir = Arc::clone(&self.dir);
        let result = tokio::task::spawn_blocking(move || dir.remove_file(&name))
            .await
            .map_err(AttachmentError::storage)?;
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AttachmentError::storage(err)),
        }
    }
}
