//! ListEntitiesHandler - Query handler for company summaries.

use std::sync::Arc;

use crate::domain::entity::EntitySummary;
use crate::domain::foundation::DomainError;
use crate::ports::EntityRepository;

pub struct ListEntitiesHandler {
    entities: Arc<dyn EntityRepository>,
}

impl ListEntitiesHandler {
    pub fn new(entities: Arc<dyn EntityRepository>) -> Self {
        Self { entities }
    }

    /// Summaries, most recently updated first.
    pub async fn handle(&self) -> Result<Vec<EntitySummary>, DomainError> {
        self.entities.list().await
    }
}
