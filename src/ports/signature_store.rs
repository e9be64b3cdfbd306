//! Signature store port.
//!
//! Holds at most one live signature image per entity. Storing a new one
//! replaces the previous image permanently; signatures are not versioned.

use async_trait::async_trait;

use super::StorageError;
use crate::domain::document::SignatureImage;
use crate::domain::foundation::EntityId;

#[async_trait]
pub trait SignatureStore: Send + Sync {
    /// Writes the entity's signature, replacing any previous one.
    ///
    /// Returns the reference to persist on the entity (`sign_<id>.<ext>`).
    async fn store(
        &self,
        entity_id: &EntityId,
        image: &SignatureImage,
    ) -> Result<String, StorageError>;

    /// Loads a signature by reference. `Ok(None)` if the artifact is gone.
    async fn load(&self, signature_ref: &str) -> Result<Option<SignatureImage>, StorageError>;
}
