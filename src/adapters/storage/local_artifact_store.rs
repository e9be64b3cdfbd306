//! Local filesystem artifact store for rendered documents.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;

use super::atomic::{is_temp_file, write_atomic};
use crate::domain::document::VersionSelector;
use crate::domain::foundation::EntityId;
use crate::ports::{ArtifactStore, StorageError, StoredArtifact};

/// Default cap on a single artifact (25 MB).
pub const DEFAULT_MAX_ARTIFACT_BYTES: u64 = 25 * 1024 * 1024;

/// Stores documents as `{root}/company_{entity_id}_v{version}.pdf`.
///
/// Writes go through a temp file and a rename, so a version is either
/// fully present or absent.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
    max_bytes: u64,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_ARTIFACT_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name(entity_id: &EntityId, version: u32) -> String {
        format!("company_{}_v{}.pdf", entity_id, version)
    }

    /// Extracts `(entity_id, version)` from a name like `company_{id}_v{n}.pdf`.
    fn parse_file_name(file_name: &str) -> Option<(EntityId, u32)> {
        if is_temp_file(file_name) {
            return None;
        }
        let stem = file_name.strip_prefix("company_")?.strip_suffix(".pdf")?;
        let (id, version) = stem.rsplit_once("_v")?;
        Some((EntityId::from_str(id).ok()?, version.parse().ok()?))
    }

    async fn latest_version(&self, entity_id: &EntityId) -> Result<Option<u32>, StorageError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut latest = None;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some((id, version)) = Self::parse_file_name(&name) {
                if id == *entity_id && latest.map_or(true, |v| version > v) {
                    latest = Some(version);
                }
            }
        }
        Ok(latest)
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    fn path_for(&self, entity_id: &EntityId, version: u32) -> String {
        Self::file_name(entity_id, version)
    }

    async fn write(
        &self,
        entity_id: &EntityId,
        version: u32,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let size = content.len() as u64;
        if size > self.max_bytes {
            return Err(StorageError::too_large(size, self.max_bytes));
        }

        let artifact_ref = self.path_for(entity_id, version);
        write_atomic(&self.root.join(&artifact_ref), content).await?;

        tracing::debug!(
            entity_id = %entity_id,
            version,
            size_bytes = size,
            "Artifact written"
        );
        Ok(artifact_ref)
    }

    async fn open(
        &self,
        entity_id: &EntityId,
        selector: VersionSelector,
    ) -> Result<StoredArtifact, StorageError> {
        let version = match selector {
            VersionSelector::Exact(v) => v,
            VersionSelector::Latest => self.latest_version(entity_id).await?.ok_or_else(|| {
                StorageError::not_found(format!("company_{}_v*.pdf", entity_id))
            })?,
        };

        let artifact_ref = self.path_for(entity_id, version);
        let path = self.root.join(&artifact_ref);
        let content = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(artifact_ref.clone()),
            _ => StorageError::io(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        Ok(StoredArtifact {
            artifact_ref,
            version,
            content,
        })
    }

    async fn exists(&self, entity_id: &EntityId, version: u32) -> Result<bool, StorageError> {
        let path = self.root.join(self.path_for(entity_id, version));
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalArtifactStore) {
        let temp = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(temp.path().join("documents"));
        (temp, store)
    }

    #[test]
    fn path_for_is_deterministic_and_distinct() {
        let (_temp, store) = setup();
        let id = EntityId::new();

        assert_eq!(store.path_for(&id, 1), store.path_for(&id, 1));
        assert_ne!(store.path_for(&id, 1), store.path_for(&id, 2));
        assert_ne!(store.path_for(&id, 1), store.path_for(&EntityId::new(), 1));
        assert_eq!(store.path_for(&id, 3), format!("company_{}_v3.pdf", id));
    }

    #[test]
    fn parse_file_name_round_trips() {
        let id = EntityId::new();
        let name = LocalArtifactStore::file_name(&id, 12);
        assert_eq!(LocalArtifactStore::parse_file_name(&name), Some((id, 12)));
        assert_eq!(LocalArtifactStore::parse_file_name("notes.txt"), None);
        assert_eq!(LocalArtifactStore::parse_file_name("company_x_v1.pdf"), None);
    }

    #[tokio::test]
    async fn write_then_open_exact() {
        let (_temp, store) = setup();
        let id = EntityId::new();

        let artifact_ref = store.write(&id, 1, b"%PDF-1").await.unwrap();
        let artifact = store.open(&id, VersionSelector::Exact(1)).await.unwrap();

        assert_eq!(artifact.artifact_ref, artifact_ref);
        assert_eq!(artifact.content, b"%PDF-1");
        assert!(store.exists(&id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn write_is_idempotent_overwrite() {
        let (_temp, store) = setup();
        let id = EntityId::new();

        store.write(&id, 1, b"old").await.unwrap();
        store.write(&id, 1, b"new").await.unwrap();

        let artifact = store.open(&id, VersionSelector::Exact(1)).await.unwrap();
        assert_eq!(artifact.content, b"new");
    }

    #[tokio::test]
    async fn open_latest_picks_highest_version() {
        let (_temp, store) = setup();
        let id = EntityId::new();
        let other = EntityId::new();

        store.write(&id, 1, b"v1").await.unwrap();
        store.write(&id, 10, b"v10").await.unwrap();
        store.write(&id, 2, b"v2").await.unwrap();
        store.write(&other, 50, b"other").await.unwrap();

        let artifact = store.open(&id, VersionSelector::Latest).await.unwrap();
        assert_eq!(artifact.version, 10);
        assert_eq!(artifact.content, b"v10");
    }

    #[tokio::test]
    async fn open_missing_version_is_not_found() {
        let (_temp, store) = setup();
        let result = store.open(&EntityId::new(), VersionSelector::Exact(1)).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn open_latest_without_directory_is_not_found() {
        let (_temp, store) = setup();
        let result = store.open(&EntityId::new(), VersionSelector::Latest).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn write_rejects_oversized_content() {
        let (_temp, store) = setup();
        let store = store.with_max_bytes(4);
        let id = EntityId::new();

        let result = store.write(&id, 1, b"too large").await;

        assert!(matches!(result, Err(StorageError::TooLarge { .. })));
        assert!(!store.exists(&id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_first_writes_share_directory() {
        let (_temp, store) = setup();
        let id = EntityId::new();

        let (a, b) = tokio::join!(store.write(&id, 1, b"a"), store.write(&id, 2, b"b"));

        assert!(a.is_ok());
        assert!(b.is_ok());
    }
}
