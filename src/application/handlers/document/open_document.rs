//! OpenDocumentHandler - Query handler returning a document's bytes.
//!
//! The version is resolved against the recorded history, so `Latest` means
//! the highest recorded version rather than whatever sits on disk.

use std::sync::Arc;

use crate::domain::document::{DocumentVersion, VersionSelector};
use crate::domain::foundation::{DomainError, EntityId, ErrorCode};
use crate::ports::{content_checksum, ArtifactStore, DocumentVersionRepository};

#[derive(Debug, Clone)]
pub struct OpenDocumentQuery {
    pub entity_id: EntityId,
    pub selector: VersionSelector,
}

#[derive(Debug, Clone)]
pub struct OpenDocumentResult {
    pub document: DocumentVersion,
    pub content: Vec<u8>,
}

pub struct OpenDocumentHandler {
    history: Arc<dyn DocumentVersionRepository>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl OpenDocumentHandler {
    pub fn new(
        history: Arc<dyn DocumentVersionRepository>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self { history, artifacts }
    }

    pub async fn handle(
        &self,
        query: OpenDocumentQuery,
    ) -> Result<OpenDocumentResult, DomainError> {
        let document = match query.selector {
            VersionSelector::Exact(version) => self.history.find(&query.entity_id, version).await?,
            VersionSelector::Latest => self.history.find_latest(&query.entity_id).await?,
        }
        .ok_or_else(|| {
            DomainError::new(
                ErrorCode::DocumentNotFound,
                format!(
                    "No document {} for entity {}",
                    query.selector, query.entity_id
                ),
            )
        })?;

        let artifact = self
            .artifacts
            .open(&query.entity_id, VersionSelector::Exact(document.version))
            .await?;

        if content_checksum(&artifact.content) != document.checksum {
            tracing::warn!(
                entity_id = %query.entity_id,
                version = document.version,
                artifact_ref = %artifact.artifact_ref,
                "Artifact checksum does not match recorded value"
            );
        }

        Ok(OpenDocumentResult {
            document,
            content: artifact.content,
        })
    }
}
