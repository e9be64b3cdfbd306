//! Entity repository port.
//!
//! Persists companies, their partners and the audit trail. Every mutating
//! call is one transaction: the entity row, partner rows and exactly one
//! audit row are committed together or not at all.

use async_trait::async_trait;

use crate::domain::entity::{BusinessEntity, EntityPatch, EntitySummary};
use crate::domain::foundation::{DomainError, EntityId, UserId};

/// Repository port for BusinessEntity persistence.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Inserts a new entity, its partners and a `create` audit row atomically.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn create(&self, entity: &BusinessEntity, actor: &UserId) -> Result<(), DomainError>;

    /// Applies `patch` to the stored entity with an `update` audit row.
    ///
    /// Returns the entity as committed.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` if `id` does not resolve
    /// - `ValidationFailed` if the patched entity is invalid or the patch is empty
    /// - `DatabaseError` on persistence failure; nothing is written
    async fn update(
        &self,
        id: &EntityId,
        patch: &EntityPatch,
        actor: &UserId,
    ) -> Result<BusinessEntity, DomainError>;

    /// Loads an entity with its partners.
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<BusinessEntity>, DomainError>;

    /// Lists summaries, most recently updated first.
    async fn list(&self) -> Result<Vec<EntitySummary>, DomainError>;

    /// Persists the reference to the entity's current signature artifact.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` if `id` does not resolve
    async fn record_signature(&self, id: &EntityId, signature_ref: &str)
        -> Result<(), DomainError>;
}
