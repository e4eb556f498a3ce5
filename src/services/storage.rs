//! Object storage seam for attachment content
//!
//! The server stores attachment metadata in the database and the bytes
//! behind this trait. The filesystem backend is the only one shipped;
//! tests mock the trait.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store bytes under a key. Custom metadata travels with the object on
    /// backends that support it.
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        metadata: &HashMap<String, String>,
    ) -> AppResult<()>;

    /// Fetch the bytes stored under a key
    async fn get(&self, key: &str) -> AppResult<Vec<u8>>;

    /// Remove the bytes stored under a key. Removing an absent key is not
    /// an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Remove stored content after its metadata row is gone. Failures are
/// logged and swallowed so the metadata deletion stays authoritative.
pub async fn remove_quietly(storage: &dyn ObjectStorage, key: &str) {
    if let Err(e) = storage.delete(key).await {
        tracing::warn!("Failed to remove stored content {}: {}", key, e);
    }
}

/// Local filesystem backend. Keys map to paths under the configured root;
/// content type and metadata are kept in the database only.
pub struct FsObjectStorage {
    root: PathBuf,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
        _metadata: &HashMap<String, String>,
    ) -> AppResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Storage write failed: {}", e)))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Storage write failed: {}", e)))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Vec<u8>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                format!("Stored content {} not found", key),
            )),
            Err(e) => Err(AppError::Internal(format!("Storage read failed: {}", e))),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!("Storage delete failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_metadata() -> HashMap<String, String> {
        HashMap::new()
    }

    #[tokio::test]
    async fn test_fs_put_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path());

        storage
            .put("activity/1/report.pdf", b"content", "application/pdf", &no_metadata())
            .await
            .unwrap();
        let bytes = storage.get("activity/1/report.pdf").await.unwrap();
        assert_eq!(bytes, b"content");
    }

    #[tokio::test]
    async fn test_fs_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path());

        let err = storage.get("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fs_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsObjectStorage::new(dir.path());

        storage
            .put("k", b"x", "text/plain", &no_metadata())
            .await
            .unwrap();
        storage.delete("k").await.unwrap();
        storage.delete("k").await.unwrap();
        assert!(matches!(
            storage.get("k").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_remove_quietly_swallows_backend_failure() {
        let mut mock = MockObjectStorage::new();
        mock.expect_delete()
            .times(1)
            .returning(|_| Err(AppError::Internal("backend down".to_string())));

        remove_quietly(&mock, "some-key").await;
    }
}
