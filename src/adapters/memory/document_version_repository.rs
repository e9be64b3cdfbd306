//! In-memory DocumentVersionRepository backed by a real ArtifactStore.
//!
//! The history lock is held across the artifact write, so the uniqueness
//! check, the write and the row insert behave like one transaction.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode};
use crate::ports::{ArtifactStore, DocumentVersionRepository};

pub struct InMemoryDocumentVersionRepository {
    history: Mutex<BTreeMap<(EntityId, u32), DocumentVersion>>,
    artifacts: Arc<dyn ArtifactStore>,
    injected_conflicts: AtomicUsize,
}

impl InMemoryDocumentVersionRepository {
    pub fn new(artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self {
            history: Mutex::new(BTreeMap::new()),
            artifacts,
            injected_conflicts: AtomicUsize::new(0),
        }
    }

    /// The next `count` calls to `record` fail with `ConcurrencyConflict`
    /// as if another writer had taken the version first.
    pub fn inject_conflicts(&self, count: usize) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.history.lock().await.len()
    }

    fn take_injected_conflict(&self) -> bool {
        self.injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn conflict(document: &DocumentVersion) -> DomainError {
    DomainError::new(
        ErrorCode::ConcurrencyConflict,
        format!(
            "Version {} already exists for entity {}",
            document.version, document.entity_id
        ),
    )
    .with_detail("version", document.version.to_string())
}

#[async_trait]
impl DocumentVersionRepository for InMemoryDocumentVersionRepository {
    async fn max_version(&self, entity_id: &EntityId) -> Result<Option<u32>, DomainError> {
        let history = self.history.lock().await;
        Ok(history
            .range((*entity_id, 0)..=(*entity_id, u32::MAX))
            .next_back()
            .map(|((_, version), _)| *version))
    }

    async fn record(&self, document: &DocumentVersion, content: &[u8]) -> Result<(), DomainError> {
        let mut history = self.history.lock().await;

        let key = (document.entity_id, document.version);
        if self.take_injected_conflict() || history.contains_key(&key) {
            return Err(conflict(document));
        }

        self.artifacts
            .write(&document.entity_id, document.version, content)
            .await?;

        history.insert(key, document.clone());
        Ok(())
    }

    async fn list(&self, entity_id: &EntityId) -> Result<Vec<DocumentVersion>, DomainError> {
        let history = self.history.lock().await;
        Ok(history
            .range((*entity_id, 0)..=(*entity_id, u32::MAX))
            .rev()
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn find(
        &self,
        entity_id: &EntityId,
        version: u32,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        Ok(self.history.lock().await.get(&(*entity_id, version)).cloned())
    }

    async fn find_latest(
        &self,
        entity_id: &EntityId,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        let history = self.history.lock().await;
        Ok(history
            .range((*entity_id, 0)..=(*entity_id, u32::MAX))
            .next_back()
            .map(|(_, doc)| doc.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalArtifactStore;
    use crate::domain::document::VersionSelector;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::ports::content_checksum;
    use tempfile::TempDir;

    fn doc(entity_id: EntityId, version: u32, content: &[u8]) -> DocumentVersion {
        DocumentVersion {
            entity_id,
            version,
            artifact_ref: format!("company_{}_v{}.pdf", entity_id, version),
            checksum: content_checksum(content),
            size_bytes: content.len() as u64,
            created_at: Timestamp::now(),
            created_by: UserId::new("editor-1").unwrap(),
        }
    }

    fn setup() -> (TempDir, Arc<LocalArtifactStore>, InMemoryDocumentVersionRepository) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalArtifactStore::new(temp.path()));
        let repo = InMemoryDocumentVersionRepository::new(store.clone());
        (temp, store, repo)
    }

    #[tokio::test]
    async fn record_writes_artifact_and_row() {
        let (_temp, store, repo) = setup();
        let id = EntityId::new();

        repo.record(&doc(id, 1, b"one"), b"one").await.unwrap();

        assert_eq!(repo.max_version(&id).await.unwrap(), Some(1));
        let artifact = store.open(&id, VersionSelector::Exact(1)).await.unwrap();
        assert_eq!(artifact.content, b"one");
    }

    #[tokio::test]
    async fn duplicate_version_conflicts_without_touching_artifact() {
        let (_temp, store, repo) = setup();
        let id = EntityId::new();
        repo.record(&doc(id, 1, b"first"), b"first").await.unwrap();

        let err = repo.record(&doc(id, 1, b"second"), b"second").await.unwrap_err();

        assert!(err.is_conflict());
        let artifact = store.open(&id, VersionSelector::Exact(1)).await.unwrap();
        assert_eq!(artifact.content, b"first");
    }

    #[tokio::test]
    async fn failed_artifact_write_keeps_no_row() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalArtifactStore::new(temp.path()).with_max_bytes(2));
        let repo = InMemoryDocumentVersionRepository::new(store);
        let id = EntityId::new();

        let err = repo.record(&doc(id, 1, b"too big"), b"too big").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(repo.max_version(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_highest_first_and_scoped_to_entity() {
        let (_temp, _store, repo) = setup();
        let a = EntityId::new();
        let b = EntityId::new();
        for v in 1..=3 {
            repo.record(&doc(a, v, b"x"), b"x").await.unwrap();
        }
        repo.record(&doc(b, 1, b"y"), b"y").await.unwrap();

        let versions: Vec<u32> = repo.list(&a).await.unwrap().iter().map(|d| d.version).collect();

        assert_eq!(versions, vec![3, 2, 1]);
        assert_eq!(repo.find_latest(&a).await.unwrap().unwrap().version, 3);
        assert_eq!(repo.find(&b, 1).await.unwrap().unwrap().entity_id, b);
        assert!(repo.find(&b, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_conflicts_are_consumed() {
        let (_temp, _store, repo) = setup();
        let id = EntityId::new();
        repo.inject_conflicts(1);

        assert!(repo.record(&doc(id, 1, b"x"), b"x").await.unwrap_err().is_conflict());
        assert!(repo.record(&doc(id, 1, b"x"), b"x").await.is_ok());
    }
}
