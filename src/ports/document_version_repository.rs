//! Document version history port.
//!
//! Version rows are append-only. The store enforces uniqueness of
//! `(entity_id, version)`; a duplicate insert fails with
//! `ErrorCode::ConcurrencyConflict` so the caller can re-allocate.

use async_trait::async_trait;

use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{DomainError, EntityId};

/// Repository port for document version records.
#[async_trait]
pub trait DocumentVersionRepository: Send + Sync {
    /// Highest recorded version for the entity, if any.
    async fn max_version(&self, entity_id: &EntityId) -> Result<Option<u32>, DomainError>;

    /// Records a rendered document and writes its artifact.
    ///
    /// The row insert and the artifact write succeed or fail together: the
    /// artifact is written while the insert is pending and the row is only
    /// committed once the write succeeded. A conflicting version is detected
    /// before the artifact is touched, so another writer's artifact is never
    /// overwritten.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the version already exists for the entity
    /// - `StorageError` if the artifact write failed (no row is kept)
    /// - `DatabaseError` on persistence failure
    async fn record(&self, document: &DocumentVersion, content: &[u8]) -> Result<(), DomainError>;

    /// Version history, highest version first.
    async fn list(&self, entity_id: &EntityId) -> Result<Vec<DocumentVersion>, DomainError>;

    /// A specific version, if recorded.
    async fn find(
        &self,
        entity_id: &EntityId,
        version: u32,
    ) -> Result<Option<DocumentVersion>, DomainError>;

    /// The highest recorded version, if any.
    async fn find_latest(&self, entity_id: &EntityId)
        -> Result<Option<DocumentVersion>, DomainError>;
}
