//! Signature Manager - the single current signature image per entity.

use std::sync::Arc;

use crate::domain::document::SignatureImage;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode, ValidationError};
use crate::ports::{EntityRepository, SignatureStore};

#[derive(Clone)]
pub struct SignatureManager {
    store: Arc<dyn SignatureStore>,
    entities: Arc<dyn EntityRepository>,
}

impl SignatureManager {
    pub fn new(store: Arc<dyn SignatureStore>, entities: Arc<dyn EntityRepository>) -> Self {
        Self { store, entities }
    }

    /// Decodes a submitted data URL without touching storage.
    pub fn decode(data_url: &str) -> Result<SignatureImage, ValidationError> {
        SignatureImage::from_data_url(data_url)
    }

    /// Writes the entity's signature, replacing the previous one, and records
    /// the new reference on the entity.
    pub async fn store_signature(
        &self,
        entity_id: &EntityId,
        image: &SignatureImage,
    ) -> Result<String, DomainError> {
        let signature_ref = self.store.store(entity_id, image).await?;
        self.entities
            .record_signature(entity_id, &signature_ref)
            .await?;

        tracing::info!(
            entity_id = %entity_id,
            signature_ref = %signature_ref,
            format = %image.format,
            "Signature stored"
        );
        Ok(signature_ref)
    }

    /// The signature stored in this request, otherwise the entity's persisted
    /// reference, otherwise none.
    pub async fn resolve_signature(
        &self,
        entity_id: &EntityId,
        explicit_ref: Option<String>,
    ) -> Result<Option<String>, DomainError> {
        if explicit_ref.is_some() {
            return Ok(explicit_ref);
        }
        let entity = self.entities.find_by_id(entity_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::EntityNotFound,
                format!("Entity {} not found", entity_id),
            )
        })?;
        Ok(entity.signature_ref)
    }

    /// Loads the image behind a reference.
    ///
    /// A missing or unreadable file yields `None` so a document can still be
    /// produced without a signature.
    pub async fn load(&self, signature_ref: &str) -> Option<SignatureImage> {
        match self.store.load(signature_ref).await {
            Ok(Some(image)) => Some(image),
            Ok(None) => {
                tracing::warn!(signature_ref, "Signature artifact missing; rendering without it");
                None
            }
            Err(e) => {
                tracing::warn!(signature_ref, error = %e, "Failed to load signature; rendering without it");
                None
            }
        }
    }
}
