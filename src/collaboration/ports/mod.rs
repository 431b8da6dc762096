//! Port contracts for collaborations and their elements.

pub mod attachments;
pub mod repository;

pub use attachments::{AttachmentError, AttachmentStore, AttachmentUpload};
pub use repository::{
    CollaborationRepository, CollaborationRepositoryError, CollaborationRepositoryResult,
    ElementStore, SequenceRevision,
};
