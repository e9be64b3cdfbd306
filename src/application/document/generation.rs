//! Document Generation Orchestrator - the document stage of create/update.
//!
//! Runs after the entity transaction committed:
//!
//! 1. Load the resolved signature image, if any
//! 2. Allocate the next version
//! 3. Render under the admission limit and timeout
//! 4. Record the version (artifact write + row insert together)
//!
//! A version conflict in step 4 restarts at step 2, up to
//! `max_version_attempts`. Any other failure is handled by the flow's
//! `RenderFailurePolicy`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Semaphore;

use super::{SignatureManager, VersionAllocator};
use crate::domain::document::{
    build_render_data, DocumentFlow, DocumentOutcome, DocumentVersion, EmbeddedSignature,
    RenderFailurePolicy, WorkflowState,
};
use crate::domain::entity::BusinessEntity;
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::{
    content_checksum, ArtifactStore, DocumentRenderer, DocumentVersionRepository, RenderError,
};

pub const DEFAULT_TEMPLATE_ID: &str = "proposal";

/// Tuning for the document stage.
#[derive(Debug, Clone)]
pub struct DocumentGenerationConfig {
    pub template_id: String,
    pub render_timeout: Duration,
    pub max_concurrent_renders: usize,
    pub max_version_attempts: u32,
    pub create_policy: RenderFailurePolicy,
    pub update_policy: RenderFailurePolicy,
}

impl Default for DocumentGenerationConfig {
    fn default() -> Self {
        Self {
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            render_timeout: Duration::from_secs(30),
            max_concurrent_renders: 4,
            max_version_attempts: 3,
            create_policy: RenderFailurePolicy::Tolerate,
            update_policy: RenderFailurePolicy::Fail,
        }
    }
}

impl DocumentGenerationConfig {
    pub fn policy_for(&self, flow: DocumentFlow) -> RenderFailurePolicy {
        match flow {
            DocumentFlow::Create => self.create_policy,
            DocumentFlow::Update => self.update_policy,
        }
    }
}

/// A document attempt that failed after `version` was allocated.
struct FailedAttempt {
    version: Option<u32>,
    error: DomainError,
}

pub struct DocumentGenerator {
    renderer: Arc<dyn DocumentRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
    history: Arc<dyn DocumentVersionRepository>,
    allocator: VersionAllocator,
    signatures: SignatureManager,
    render_gate: Semaphore,
    config: DocumentGenerationConfig,
}

impl DocumentGenerator {
    pub fn new(
        renderer: Arc<dyn DocumentRenderer>,
        artifacts: Arc<dyn ArtifactStore>,
        history: Arc<dyn DocumentVersionRepository>,
        signatures: SignatureManager,
        config: DocumentGenerationConfig,
    ) -> Self {
        Self {
            renderer,
            artifacts,
            allocator: VersionAllocator::new(history.clone()),
            history,
            signatures,
            render_gate: Semaphore::new(config.max_concurrent_renders.max(1)),
            config,
        }
    }

    pub fn config(&self) -> &DocumentGenerationConfig {
        &self.config
    }

    /// Produces the next document version for a committed entity.
    ///
    /// Returns `DocumentOutcome::RenderFailed` when the failure is tolerated
    /// by the flow's policy.
    ///
    /// # Errors
    ///
    /// - `RenderFailed`/`StorageError`/`DatabaseError` when the policy is `Fail`
    /// - `ConcurrencyConflict` when every allocation attempt lost a race
    pub async fn generate(
        &self,
        entity: &BusinessEntity,
        flow: DocumentFlow,
        signature_ref: Option<&str>,
        actor: &UserId,
    ) -> Result<DocumentOutcome, DomainError> {
        tracing::debug!(
            entity_id = %entity.id,
            %flow,
            state = %WorkflowState::RenderingDocument,
            "Generating document"
        );

        match self.render_and_record(entity, signature_ref, actor).await {
            Ok(document) => {
                tracing::info!(
                    entity_id = %entity.id,
                    %flow,
                    version = document.version,
                    artifact_ref = %document.artifact_ref,
                    state = %WorkflowState::DocumentRecorded,
                    "Document recorded"
                );
                Ok(DocumentOutcome::Recorded(document))
            }
            Err(failure) if failure.error.is_conflict() => {
                tracing::error!(
                    entity_id = %entity.id,
                    %flow,
                    attempts = self.config.max_version_attempts,
                    "Version allocation retries exhausted"
                );
                Err(failure.error)
            }
            Err(FailedAttempt { version, error }) => {
                let policy = self.config.policy_for(flow);
                tracing::error!(
                    entity_id = %entity.id,
                    %flow,
                    ?version,
                    ?policy,
                    error = %error,
                    state = %WorkflowState::RenderFailed,
                    "Document generation failed"
                );
                match policy {
                    RenderFailurePolicy::Tolerate => Ok(DocumentOutcome::RenderFailed {
                        version,
                        reason: error.message,
                    }),
                    RenderFailurePolicy::Fail => Err(error),
                }
            }
        }
    }

    async fn render_and_record(
        &self,
        entity: &BusinessEntity,
        signature_ref: Option<&str>,
        actor: &UserId,
    ) -> Result<DocumentVersion, FailedAttempt> {
        let signature = match signature_ref {
            Some(r) => self.signatures.load(r).await,
            None => None,
        };
        let embedded = signature.as_ref().map(|s| EmbeddedSignature {
            format: s.format,
            bytes: &s.bytes,
        });

        let max_attempts = self.config.max_version_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let version = self
                .allocator
                .next_version(&entity.id)
                .await
                .map_err(|error| FailedAttempt {
                    version: None,
                    error,
                })?;
            let created_at = Timestamp::now();
            let data = build_render_data(entity, version, embedded, created_at);

            let content = self.render(&data).await.map_err(|e| FailedAttempt {
                version: Some(version),
                error: e.into(),
            })?;

            let document = DocumentVersion {
                entity_id: entity.id,
                version,
                artifact_ref: self.artifacts.path_for(&entity.id, version),
                checksum: content_checksum(&content),
                size_bytes: content.len() as u64,
                created_at,
                created_by: actor.clone(),
            };

            match self.history.record(&document, &content).await {
                Ok(()) => return Ok(document),
                Err(e) if e.is_conflict() && attempt < max_attempts => {
                    tracing::warn!(
                        entity_id = %entity.id,
                        version,
                        attempt,
                        "Version taken by a concurrent writer, reallocating"
                    );
                }
                Err(error) => {
                    return Err(FailedAttempt {
                        version: Some(version),
                        error,
                    })
                }
            }
        }
    }

    async fn render(&self, data: &Value) -> Result<Vec<u8>, RenderError> {
        let _permit = self
            .render_gate
            .acquire()
            .await
            .map_err(|_| RenderError::EngineFailed("Render admission closed".to_string()))?;

        let rendering = self.renderer.render(&self.config.template_id, data);
        match tokio::time::timeout(self.config.render_timeout, rendering).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(self.config.render_timeout.as_secs())),
        }
    }
}
