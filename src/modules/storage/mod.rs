//! Local upload storage
//!
//! The blob store writes validated data-URI payloads to disk; the attachment
//! manager ties those files to the entities that own them.

pub mod attachment_manager;
pub mod blob_store;
pub mod entity_locks;

pub use attachment_manager::AttachmentManager;
pub use blob_store::{AttachmentKind, BlobStore};
