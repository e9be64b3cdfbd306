//! ListDocumentsHandler - Query handler for an entity's version history.

use std::sync::Arc;

use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode};
use crate::ports::{DocumentVersionRepository, EntityRepository};

#[derive(Debug, Clone)]
pub struct ListDocumentsQuery {
    pub entity_id: EntityId,
}

pub struct ListDocumentsHandler {
    entities: Arc<dyn EntityRepository>,
    history: Arc<dyn DocumentVersionRepository>,
}

impl ListDocumentsHandler {
    pub fn new(
        entities: Arc<dyn EntityRepository>,
        history: Arc<dyn DocumentVersionRepository>,
    ) -> Self {
        Self { entities, history }
    }

    /// Versions of the entity's document, highest first.
    pub async fn handle(
        &self,
        query: ListDocumentsQuery,
    ) -> Result<Vec<DocumentVersion>, DomainError> {
        if self.entities.find_by_id(&query.entity_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::EntityNotFound,
                format!("Entity {} not found", query.entity_id),
            ));
        }
        self.history.list(&query.entity_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDocumentVersionRepository, InMemoryEntityRepository};
    use crate::adapters::storage::LocalArtifactStore;
    use crate::domain::entity::{BusinessEntity, EntityFields};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::ports::content_checksum;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_highest_version_first() {
        let temp = TempDir::new().unwrap();
        let entities = Arc::new(InMemoryEntityRepository::new());
        let history = Arc::new(InMemoryDocumentVersionRepository::new(Arc::new(
            LocalArtifactStore::new(temp.path()),
        )));
        let actor = UserId::new("editor-1").unwrap();
        let entity = BusinessEntity::register(EntityFields::named("Acme"), vec![]).unwrap();
        entities.create(&entity, &actor).await.unwrap();
        for version in 1..=2 {
            let doc = DocumentVersion {
                entity_id: entity.id,
                version,
                artifact_ref: format!("company_{}_v{}.pdf", entity.id, version),
                checksum: content_checksum(b"%PDF"),
                size_bytes: 4,
                created_at: Timestamp::now(),
                created_by: actor.clone(),
            };
            history.record(&doc, b"%PDF").await.unwrap();
        }

        let docs = ListDocumentsHandler::new(entities, history)
            .handle(ListDocumentsQuery { entity_id: entity.id })
            .await
            .unwrap();

        assert_eq!(docs.iter().map(|d| d.version).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn unknown_entity_is_not_found() {
        let temp = TempDir::new().unwrap();
        let handler = ListDocumentsHandler::new(
            Arc::new(InMemoryEntityRepository::new()),
            Arc::new(InMemoryDocumentVersionRepository::new(Arc::new(
                LocalArtifactStore::new(temp.path()),
            ))),
        );

        let err = handler
            .handle(ListDocumentsQuery { entity_id: EntityId::new() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EntityNotFound);
    }
}
