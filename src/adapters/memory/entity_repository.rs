//! In-memory EntityRepository.
//!
//! Thread-safe via an internal `Mutex`. A mutating call either applies the
//! entity change and its audit row together or leaves state untouched.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::entity::{AuditAction, AuditEntry, BusinessEntity, EntityPatch, EntitySummary};
use crate::domain::foundation::{DomainError, EntityId, ErrorCode, UserId};
use crate::ports::EntityRepository;

#[derive(Default)]
struct State {
    entities: HashMap<EntityId, BusinessEntity>,
    audit: Vec<AuditEntry>,
}

#[derive(Default)]
pub struct InMemoryEntityRepository {
    state: Mutex<State>,
    fail_next: Mutex<Option<DomainError>>,
}

impl InMemoryEntityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next mutating call fails with `error` and changes nothing.
    pub fn fail_next_write(&self, error: DomainError) {
        *self.fail_next.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Audit rows in commit order.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .audit
            .clone()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entities
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> Result<(), DomainError> {
        match self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn not_found(id: &EntityId) -> DomainError {
    DomainError::new(ErrorCode::EntityNotFound, format!("Entity {} not found", id))
        .with_detail("entity_id", id.to_string())
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn create(&self, entity: &BusinessEntity, actor: &UserId) -> Result<(), DomainError> {
        self.take_failure()?;

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.entities.contains_key(&entity.id) {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Entity {} already exists", entity.id),
            ));
        }
        state.entities.insert(entity.id, entity.clone());
        state
            .audit
            .push(AuditEntry::company(entity.id, AuditAction::Create, actor.clone()));
        Ok(())
    }

    async fn update(
        &self,
        id: &EntityId,
        patch: &EntityPatch,
        actor: &UserId,
    ) -> Result<BusinessEntity, DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entity = state.entities.get(id).cloned().ok_or_else(|| not_found(id))?;
        entity.apply_patch(patch)?;

        self.take_failure()?;

        state.entities.insert(*id, entity.clone());
        state
            .audit
            .push(AuditEntry::company(*id, AuditAction::Update, actor.clone()));
        Ok(entity)
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<BusinessEntity>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entities
            .get(id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<EntitySummary>, DomainError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut summaries: Vec<EntitySummary> =
            state.entities.values().map(BusinessEntity::summary).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn record_signature(
        &self,
        id: &EntityId,
        signature_ref: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let entity = state.entities.get_mut(id).ok_or_else(|| not_found(id))?;
        entity.signature_ref = Some(signature_ref.to_string());
        Ok(())
    }
}
