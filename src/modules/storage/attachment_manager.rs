//! Attachment lifecycle management
//!
//! Binds files written by the [`BlobStore`] to the entity that owns them.
//! The file stem is renamed to the owner's id and superseded files are
//! removed once the owning record has been written. The file of a deleted
//! entity is removed with it.
//!
//! Replacements are staged: the new payload sits under a temporary name
//! while the record is written with its final path, and only a committed
//! record write moves it onto `<id>.<ext>`. A failed write never touches the
//! file the record currently serves.
//!
//! Only blob validation is fatal. Rename and delete failures are logged and
//! the entity operation carries on; the database record is authoritative.

use tokio::sync::MutexGuard;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::Result;
use crate::modules::storage::blob_store::{AttachmentKind, BlobStore};
use crate::modules::storage::entity_locks::EntityLocks;
use crate::shared::constants::ENTITY_LOCK_SHARDS;

/// A replacement payload written under a temporary name
#[derive(Debug)]
pub struct StagedAttachment {
    temp_path: String,
    final_path: String,
    owner: Uuid,
}

impl StagedAttachment {
    /// Path to persist on the owning record
    pub fn final_path(&self) -> &str {
        &self.final_path
    }
}

pub struct AttachmentManager {
    blob_store: BlobStore,
    locks: EntityLocks,
}

impl AttachmentManager {
    pub fn new(blob_store: BlobStore) -> Self {
        Self {
            blob_store,
            locks: EntityLocks::new(ENTITY_LOCK_SHARDS),
        }
    }

    pub fn blob_store(&self) -> &BlobStore {
        &self.blob_store
    }

    /// Serialize attachment writes for one entity.
    ///
    /// Hold the guard across read, store, persist and cleanup.
    pub async fn lock(&self, owner: Uuid) -> MutexGuard<'_, ()> {
        self.locks.lock(owner).await
    }

    /// Write a payload under a temporary name (validation errors propagate)
    pub async fn store(&self, payload: &str, kind: AttachmentKind) -> Result<String> {
        self.blob_store.store(payload, kind).await
    }

    /// Rename a temporary file so its stem is the owner's id.
    ///
    /// Falls back to `temp_path` when the rename fails.
    pub async fn bind(&self, temp_path: &str, owner: Uuid) -> String {
        match self.blob_store.rename(temp_path, &owner.to_string()).await {
            Ok(final_path) => final_path,
            Err(e) => {
                warn!(
                    owner = %owner,
                    "Could not rename attachment {} to owner id, keeping temporary name: {}",
                    temp_path,
                    e
                );
                temp_path.to_string()
            }
        }
    }

    /// Store a payload and bind it to `owner` in one step
    pub async fn attach(&self, payload: &str, kind: AttachmentKind, owner: Uuid) -> Result<String> {
        let temp_path = self.store(payload, kind).await?;
        Ok(self.bind(&temp_path, owner).await)
    }

    /// Best-effort removal of a referenced file
    pub async fn discard(&self, path: &str) {
        match self.blob_store.remove(path).await {
            Ok(true) => info!("Attachment removed: {}", path),
            Ok(false) => {}
            Err(e) => warn!("Could not remove attachment {}: {}", path, e),
        }
    }

    /// Remove the file a record pointed to before `current` replaced it.
    ///
    /// Nothing is removed when both references are the same path, since the
    /// rename already replaced the file in place.
    pub async fn release_superseded(&self, previous: Option<&str>, current: Option<&str>) {
        if let (Some(previous), Some(current)) = (previous, current) {
            if previous != current {
                self.discard(previous).await;
            }
        }
    }

    /// Write a replacement payload without touching the owner's current file
    pub async fn stage(
        &self,
        payload: &str,
        kind: AttachmentKind,
        owner: Uuid,
    ) -> Result<StagedAttachment> {
        let temp_path = self.store(payload, kind).await?;
        let final_path = self
            .blob_store
            .renamed_path(&temp_path, &owner.to_string())
            .unwrap_or_else(|| temp_path.clone());

        Ok(StagedAttachment {
            temp_path,
            final_path,
            owner,
        })
    }

    /// Move a staged file onto its final path once the record write committed.
    ///
    /// Returns the path now holding the file. It differs from
    /// [`StagedAttachment::final_path`] only when the rename failed, in which
    /// case the record must be pointed at the returned temporary path.
    pub async fn commit(&self, staged: StagedAttachment) -> String {
        self.bind(&staged.temp_path, staged.owner).await
    }

    /// Drop a staged file whose record write did not go through
    pub async fn abandon(&self, staged: StagedAttachment) {
        self.discard(&staged.temp_path).await;
    }
}
