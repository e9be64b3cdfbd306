//! CreateEntityHandler - registers a company and produces its first document.

use std::sync::Arc;

use thiserror::Error;

use super::ensure_writer;
use crate::application::document::{DocumentGenerator, SignatureManager};
use crate::domain::document::{DocumentFlow, DocumentOutcome, RenderFailurePolicy, WorkflowState};
use crate::domain::entity::{BusinessEntity, EntityFields, Partner};
use crate::domain::foundation::{CommandMetadata, DomainError, Role, ValidationError};
use crate::ports::EntityRepository;

/// Command to register a company.
#[derive(Debug, Clone)]
pub struct CreateEntityCommand {
    pub fields: EntityFields,
    pub partners: Vec<Partner>,
    /// Optional `data:image/...;base64,` signature.
    pub signature: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateEntityResult {
    pub entity: BusinessEntity,
    pub document: DocumentOutcome,
}

#[derive(Debug, Clone, Error)]
pub enum CreateEntityError {
    #[error("Role '{0}' may not create entities")]
    Forbidden(Role),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ValidationError> for CreateEntityError {
    fn from(err: ValidationError) -> Self {
        CreateEntityError::Domain(err.into())
    }
}

/// Handler for entity creation.
///
/// The entity, its partners and the audit row commit together before any
/// document work starts. A render failure afterwards never rolls the entity
/// back; under the default policy it yields `DocumentOutcome::RenderFailed`.
pub struct CreateEntityHandler {
    entities: Arc<dyn EntityRepository>,
    signatures: SignatureManager,
    generator: Arc<DocumentGenerator>,
}

impl CreateEntityHandler {
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
        cmd: CreateEntityCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateEntityResult, CreateEntityError> {
        if !ensure_writer(&metadata) {
            return Err(CreateEntityError::Forbidden(metadata.role));
        }
        let correlation_id = metadata.correlation_id();

        // Validating
        let mut entity = BusinessEntity::register(cmd.fields, cmd.partners)?;
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(SignatureManager::decode)
            .transpose()?;

        // Persisting
        self.entities.create(&entity, &metadata.user_id).await?;
        tracing::info!(
            entity_id = %entity.id,
            user_id = %metadata.user_id,
            %correlation_id,
            partners = entity.partners.len(),
            state = %WorkflowState::Committed,
            "Entity created"
        );

        if let Some(image) = signature {
            match self.signatures.store_signature(&entity.id, &image).await {
                Ok(signature_ref) => entity.signature_ref = Some(signature_ref),
                Err(e) => match self.generator.config().policy_for(DocumentFlow::Create) {
                    RenderFailurePolicy::Tolerate => {
                        tracing::warn!(entity_id = %entity.id, error = %e, "Failed to store signature");
                    }
                    RenderFailurePolicy::Fail => return Err(e.into()),
                },
            }
        }

        let document = self
            .generator
            .generate(
                &entity,
                DocumentFlow::Create,
                entity.signature_ref.as_deref(),
                &metadata.user_id,
            )
            .await?;

        Ok(CreateEntityResult { entity, document })
    }
}
