//! UpdateEntityHandler - patches a company and produces the next document.

use std::sync::Arc;

use thiserror::Error;

use super::ensure_writer;
use crate::application::document::{DocumentGenerator, SignatureManager};
use crate::domain::document::{DocumentFlow, DocumentOutcome, WorkflowState};
use crate::domain::entity::{BusinessEntity, EntityPatch};
use crate::domain::foundation::{CommandMetadata, DomainError, EntityId, Role, ValidationError};
use crate::ports::EntityRepository;

/// Command to update a company.
#[derive(Debug, Clone)]
pub struct UpdateEntityCommand {
    pub id: EntityId,
    pub patch: EntityPatch,
    /// Optional replacement signature as an image data URL.
    pub signature: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateEntityResult {
    pub entity: BusinessEntity,
    pub document: DocumentOutcome,
}

#[derive(Debug, Clone, Error)]
pub enum UpdateEntityError {
    #[error("Role '{0}' may not update entities")]
    Forbidden(Role),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ValidationError> for UpdateEntityError {
    fn from(err: ValidationError) -> Self {
        UpdateEntityError::Domain(err.into())
    }
}

/// Handler for entity updates.
///
/// A request must change at least one field or the partner list. A new
/// signature alone is rejected.
pub struct UpdateEntityHandler {
    entities: Arc<dyn EntityRepository>,
    signatures: SignatureManager,
    generator: Arc<DocumentGenerator>,
}

impl UpdateEntityHandler {
    pub fn new(
        entities: Arc<dyn EntityRepository>,
        signatures: SignatureManager,
        generator: Arc<DocumentGenerator>,
    ) -> Self {
        Self {
            entities,
            signatures,
            generator,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateEntityCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateEntityResult, UpdateEntityError> {
        if !ensure_writer(&metadata) {
            return Err(UpdateEntityError::Forbidden(metadata.role));
        }
        let correlation_id = metadata.correlation_id();

        // Validating
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(SignatureManager::decode)
            .transpose()?;
        if cmd.patch.is_empty() {
            return Err(ValidationError::EmptyPatch.into());
        }

        // Persisting
        let entity = self
            .entities
            .update(&cmd.id, &cmd.patch, &metadata.user_id)
            .await?;
        tracing::info!(
            entity_id = %cmd.id,
            user_id = %metadata.user_id,
            %correlation_id,
            state = %WorkflowState::Committed,
            "Entity updated"
        );

        let explicit_ref = match signature {
            Some(image) => Some(self.signatures.store_signature(&entity.id, &image).await?),
            None => None,
        };
        let signature_ref = self
            .signatures
            .resolve_signature(&entity.id, explicit_ref)
            .await?;

        let document = self
            .generator
            .generate(
                &entity,
                DocumentFlow::Update,
                signature_ref.as_deref(),
                &metadata.user_id,
            )
            .await?;

        let mut entity = entity;
        entity.signature_ref = signature_ref;
        Ok(UpdateEntityResult { entity, document })
    }
}
