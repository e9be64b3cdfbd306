//! Local filesystem signature store.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use super::atomic::write_atomic;
use crate::domain::document::{ImageFormat, SignatureImage};
use crate::domain::foundation::EntityId;
use crate::ports::{SignatureStore, StorageError};

/// Stores one signature per entity as `{root}/sign_{entity_id}.{ext}`.
///
/// Concurrent submissions for the same entity are last-write-wins.
#[derive(Debug, Clone)]
pub struct LocalSignatureStore {
    root: PathBuf,
}

impl LocalSignatureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_name(entity_id: &EntityId, format: ImageFormat) -> String {
        format!("sign_{}.{}", entity_id, format.extension())
    }

    /// Rejects references that could escape the store root.
    fn checked_path(&self, signature_ref: &str) -> Result<PathBuf, StorageError> {
        let plain = !signature_ref.is_empty()
            && !signature_ref.contains(&['/', '\\'][..])
            && signature_ref != "."
            && signature_ref != "..";
        if !plain {
            return Err(StorageError::io(format!(
                "Invalid signature reference '{}'",
                signature_ref
            )));
        }
        Ok(self.root.join(signature_ref))
    }

    /// Removes signatures of the entity stored under other image formats.
    async fn remove_other_formats(&self, entity_id: &EntityId, keep: ImageFormat) {
        for format in ImageFormat::ALL.into_iter().filter(|f| *f != keep) {
            let path = self.root.join(Self::file_name(entity_id, format));
            match fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed stale signature"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove stale signature"
                ),
            }
        }
    }
}

#[async_trait]
impl SignatureStore for LocalSignatureStore {
    async fn store(
        &self,
        entity_id: &EntityId,
        image: &SignatureImage,
    ) -> Result<String, StorageError> {
        let signature_ref = Self::file_name(entity_id, image.format);
        write_atomic(&self.root.join(&signature_ref), &image.bytes).await?;
        self.remove_other_formats(entity_id, image.format).await;
        Ok(signature_ref)
    }

    async fn load(&self, signature_ref: &str) -> Result<Option<SignatureImage>, StorageError> {
        let path = self.checked_path(signature_ref)?;

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                StorageError::io(format!("Unknown signature format for '{}'", signature_ref))
            })?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(SignatureImage { format, bytes })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn png(bytes: &[u8]) -> SignatureImage {
        SignatureImage {
            format: ImageFormat::Png,
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn store_then_load() {
        let temp = TempDir::new().unwrap();
        let store = LocalSignatureStore::new(temp.path());
        let id = EntityId::new();

        let signature_ref = store.store(&id, &png(b"ink")).await.unwrap();

        assert_eq!(signature_ref, format!("sign_{}.png", id));
        let loaded = store.load(&signature_ref).await.unwrap().unwrap();
        assert_eq!(loaded, png(b"ink"));
    }

    #[tokio::test]
    async fn new_signature_replaces_previous() {
        let temp = TempDir::new().unwrap();
        let store = LocalSignatureStore::new(temp.path());
        let id = EntityId::new();

        let first = store.store(&id, &png(b"one")).await.unwrap();
        let second = store.store(&id, &png(b"two")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load(&second).await.unwrap().unwrap().bytes, b"two");
    }

    #[tokio::test]
    async fn changing_format_leaves_one_live_file() {
        let temp = TempDir::new().unwrap();
        let store = LocalSignatureStore::new(temp.path());
        let id = EntityId::new();

        let png_ref = store.store(&id, &png(b"png")).await.unwrap();
        let jpg_ref = store
            .store(
                &id,
                &SignatureImage {
                    format: ImageFormat::Jpeg,
                    bytes: b"jpg".to_vec(),
                },
            )
            .await
            .unwrap();

        assert!(store.load(&png_ref).await.unwrap().is_none());
        assert_eq!(store.load(&jpg_ref).await.unwrap().unwrap().format, ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn missing_signature_loads_none() {
        let temp = TempDir::new().unwrap();
        let store = LocalSignatureStore::new(temp.path());
        let missing = format!("sign_{}.png", EntityId::new());

        assert!(store.load(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = LocalSignatureStore::new(temp.path());

        assert!(store.load("../etc/passwd.png").await.is_err());
        assert!(store.load("..").await.is_err());
    }
}
