//! Version Allocator - next document version for an entity.

use std::sync::Arc;

use crate::domain::document::next_version_after;
use crate::domain::foundation::{DomainError, EntityId};
use crate::ports::DocumentVersionRepository;

/// Computes `1 + max(recorded version)`, or `1` for an empty history.
///
/// Reads history at call time without taking a lock. Two callers can receive
/// the same number; the repository's uniqueness check rejects the loser,
/// which then allocates again.
#[derive(Clone)]
pub struct VersionAllocator {
    history: Arc<dyn DocumentVersionRepository>,
}

impl VersionAllocator {
    pub fn new(history: Arc<dyn DocumentVersionRepository>) -> Self {
        Self { history }
    }

    pub async fn next_version(&self, entity_id: &EntityId) -> Result<u32, DomainError> {
        let max = self.history.max_version(entity_id).await?;
        Ok(next_version_after(max))
    }
}
