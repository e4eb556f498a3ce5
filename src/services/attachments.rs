//! Attachment service
//!
//! Metadata lives in the database, bytes behind the ObjectStorage seam.
//! Bytes are written before their metadata row, so a failure can leave an
//! unreferenced blob but never a row without content. Deleting an owner
//! entity leaves its attachments in place.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::attachment::Attachment,
    models::enums::AttachmentOwner,
    repository::Repository,
    services::storage::{self, ObjectStorage},
};

#[derive(Clone)]
pub struct AttachmentsService {
    repository: Repository,
    storage: Arc<dyn ObjectStorage>,
}

impl AttachmentsService {
    pub fn new(repository: Repository, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { repository, storage }
    }

    /// Store an uploaded file and record its metadata
    pub async fn upload(
        &self,
        owner_type: AttachmentOwner,
        owner_id: i32,
        original_name: &str,
        mime_type: &str,
        bytes: &[u8],
        category: Option<&str>,
    ) -> AppResult<Attachment> {
        self.verify_owner(owner_type, owner_id).await?;

        let storage_key = storage_key(owner_type, owner_id);
        let mut metadata = HashMap::new();
        metadata.insert("original-name".to_string(), original_name.to_string());
        if let Some(category) = category {
            metadata.insert("category".to_string(), category.to_string());
        }

        self.storage
            .put(&storage_key, bytes, mime_type, &metadata)
            .await?;

        self.repository
            .attachments
            .create(
                owner_type,
                owner_id,
                original_name,
                &storage_key,
                mime_type,
                bytes.len() as i64,
                category,
            )
            .await
    }

    /// List attachments of an owner, optionally filtered by category
    pub async fn list(
        &self,
        owner_type: AttachmentOwner,
        owner_id: i32,
        category: Option<&str>,
    ) -> AppResult<Vec<Attachment>> {
        self.verify_owner(owner_type, owner_id).await?;
        self.repository
            .attachments
            .list_for_owner(owner_type, owner_id, category)
            .await
    }

    /// Fetch an attachment and its content
    pub async fn download(&self, id: i32) -> AppResult<(Attachment, Vec<u8>)> {
        let attachment = self.repository.attachments.get_by_id(id).await?;
        let bytes = self.storage.get(&attachment.storage_key).await?;
        Ok((attachment, bytes))
    }

    /// Delete an attachment. The metadata row goes first; content removal
    /// failures are logged, not surfaced.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let attachment = self.repository.attachments.get_by_id(id).await?;
        self.repository.attachments.delete(id).await?;
        storage::remove_quietly(self.storage.as_ref(), &attachment.storage_key).await;
        Ok(())
    }

    async fn verify_owner(&self, owner_type: AttachmentOwner, owner_id: i32) -> AppResult<()> {
        match owner_type {
            AttachmentOwner::Activity => {
                self.repository.activities.get_by_id(owner_id).await?;
            }
            AttachmentOwner::Equipment => {
                self.repository.equipment.get_by_id(owner_id).await?;
            }
        }
        Ok(())
    }
}

/// Storage keys are namespaced by owner and never reuse client-supplied
/// names.
fn storage_key(owner_type: AttachmentOwner, owner_id: i32) -> String {
    format!("{}/{}/{}", owner_type, owner_id, Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_namespaced_and_unique() {
        let a = storage_key(AttachmentOwner::Activity, 42);
        let b = storage_key(AttachmentOwner::Activity, 42);
        assert!(a.starts_with("activity/42/"));
        assert_ne!(a, b);
    }
}
