//! GetEntityHandler - Query handler for one company with its partners.

use std::sync::Arc;

use crate::domain::entity::BusinessEntity;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode};
use crate::ports::EntityRepository;

#[derive(Debug, Clone)]
pub struct GetEntityQuery {
    pub id: EntityId,
}

pub struct GetEntityHandler {
    entities: Arc<dyn EntityRepository>,
}

impl GetEntityHandler {
    pub fn new(entities: Arc<dyn EntityRepository>) -> Self {
        Self { entities }
    }

    pub async fn handle(&self, query: GetEntityQuery) -> Result<BusinessEntity, DomainError> {
        self.entities.find_by_id(&query.id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::EntityNotFound,
                format!("Entity {} not found", query.id),
            )
            .with_detail("entity_id", query.id.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryEntityRepository;
    use crate::domain::entity::{EntityFields, Partner};
    use crate::domain::foundation::UserId;

    #[tokio::test]
    async fn returns_entity_with_partners() {
        let repo = Arc::new(InMemoryEntityRepository::new());
        let entity = BusinessEntity::register(
            EntityFields::named("Acme"),
            vec![Partner::new("Ana", "111"), Partner::new("", "")],
        )
        .unwrap();
        repo.create(&entity, &UserId::new("u").unwrap()).await.unwrap();

        let found = GetEntityHandler::new(repo)
            .handle(GetEntityQuery { id: entity.id })
            .await
            .unwrap();

        assert_eq!(found.partners, vec![Partner::new("Ana", "111")]);
    }

    #[tokio::test]
    async fn missing_entity_is_not_found() {
        let handler = GetEntityHandler::new(Arc::new(InMemoryEntityRepository::new()));

        let err = handler
            .handle(GetEntityQuery { id: EntityId::new() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::EntityNotFound);
    }
}
