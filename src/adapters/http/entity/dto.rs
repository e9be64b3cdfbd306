//! Data Transfer Objects for company and document endpoints.
//!
//! Request bodies flatten the domain field set so the JSON stays a single
//! object: `{"fantasyName": "...", "partners": [...], "signature": "data:..."}`.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    CreateEntityCommand, CreateEntityResult, UpdateEntityCommand, UpdateEntityResult,
};
use crate::domain::document::{DocumentOutcome, DocumentVersion};
use crate::domain::entity::{EntityFields, EntityPatch, Partner};
use crate::domain::foundation::{EntityId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request body for `POST /api/entities`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityRequest {
    #[serde(flatten)]
    pub fields: EntityFields,

    #[serde(default)]
    pub partners: Vec<Partner>,

    /// `data:image/<fmt>;base64,...`
    #[serde(default, alias = "signatureBase64", alias = "signature_base64")]
    pub signature: Option<String>,
}

impl From<CreateEntityRequest> for CreateEntityCommand {
    fn from(req: CreateEntityRequest) -> Self {
        Self {
            fields: req.fields,
            partners: req.partners,
            signature: req.signature,
        }
    }
}

/// Request body for `PUT /api/entities/:id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntityRequest {
    #[serde(flatten)]
    pub patch: EntityPatch,

    #[serde(default, alias = "signatureBase64", alias = "signature_base64")]
    pub signature: Option<String>,
}

impl UpdateEntityRequest {
    pub fn into_command(self, id: EntityId) -> UpdateEntityCommand {
        UpdateEntityCommand {
            id,
            patch: self.patch,
            signature: self.signature,
        }
    }
}

/// Query parameters for `GET /api/entities/:id/document`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    /// Absent or `0` selects the highest version.
    pub version: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a successful create.
///
/// `pdf` is null when the document could not be produced; the company
/// itself is saved either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntityResponse {
    pub ok: bool,
    pub id: String,
    pub version: Option<u32>,
    pub pdf: Option<String>,
    pub message: String,
}

impl From<&CreateEntityResult> for CreateEntityResponse {
    fn from(result: &CreateEntityResult) -> Self {
        let (pdf, message) = match &result.document {
            DocumentOutcome::Recorded(doc) => (
                Some(doc.artifact_ref.clone()),
                "Company created and PDF generated",
            ),
            DocumentOutcome::RenderFailed { .. } => (None, "Company created (PDF not generated)"),
        };
        Self {
            ok: true,
            id: result.entity.id.to_string(),
            version: result.document.version(),
            pdf,
            message: message.to_string(),
        }
    }
}

/// Response for a successful update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEntityResponse {
    pub ok: bool,
    pub version: Option<u32>,
}

impl From<&UpdateEntityResult> for UpdateEntityResponse {
    fn from(result: &UpdateEntityResult) -> Self {
        Self {
            ok: true,
            version: result.document.recorded().map(|doc| doc.version),
        }
    }
}

/// One row of an entity's document history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersionResponse {
    pub version: u32,
    pub artifact_ref: String,
    pub created_at: Timestamp,
    pub created_by: String,
    pub checksum: String,
    pub size_bytes: u64,
}

impl From<DocumentVersion> for DocumentVersionResponse {
    fn from(doc: DocumentVersion) -> Self {
        Self {
            version: doc.version,
            artifact_ref: doc.artifact_ref,
            created_at: doc.created_at,
            created_by: doc.created_by.to_string(),
            checksum: doc.checksum,
            size_bytes: doc.size_bytes,
        }
    }
}
