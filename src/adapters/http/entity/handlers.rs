//! HTTP handlers for company and document endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::document::{DocumentGenerator, SignatureManager};
use crate::application::handlers::{
    CreateEntityHandler, GetEntityHandler, GetEntityQuery, ListDocumentsHandler,
    ListDocumentsQuery, ListEntitiesHandler, OpenDocumentHandler, OpenDocumentQuery,
    OpenDocumentResult, UpdateEntityHandler,
};
use crate::domain::document::{DocumentOutcome, VersionSelector};
use crate::domain::foundation::{AuthenticatedUser, CommandMetadata, EntityId};
use crate::ports::{ArtifactStore, DocumentVersionRepository, EntityRepository};

use super::dto::{
    CreateEntityRequest, CreateEntityResponse, DocumentQuery, DocumentVersionResponse,
    UpdateEntityRequest, UpdateEntityResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Application state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for company endpoints.
#[derive(Clone)]
pub struct EntityAppState {
    pub entities: Arc<dyn EntityRepository>,
    pub history: Arc<dyn DocumentVersionRepository>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub signatures: SignatureManager,
    pub generator: Arc<DocumentGenerator>,
}

impl EntityAppState {
    pub fn create_entity_handler(&self) -> CreateEntityHandler {
        CreateEntityHandler::new(
            self.entities.clone(),
            self.signatures.clone(),
            self.generator.clone(),
        )
    }

    pub fn update_entity_handler(&self) -> UpdateEntityHandler {
        UpdateEntityHandler::new(
            self.entities.clone(),
            self.signatures.clone(),
            self.generator.clone(),
        )
    }

    pub fn get_entity_handler(&self) -> GetEntityHandler {
        GetEntityHandler::new(self.entities.clone())
    }

    pub fn list_entities_handler(&self) -> ListEntitiesHandler {
        ListEntitiesHandler::new(self.entities.clone())
    }

    pub fn list_documents_handler(&self) -> ListDocumentsHandler {
        ListDocumentsHandler::new(self.entities.clone(), self.history.clone())
    }

    pub fn open_document_handler(&self) -> OpenDocumentHandler {
        OpenDocumentHandler::new(self.history.clone(), self.artifacts.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_entity_id(raw: &str) -> Result<EntityId, ApiError> {
    raw.parse::<EntityId>()
        .map_err(|_| ApiError::bad_request(format!("Invalid entity ID: {}", raw)))
}

fn metadata_for(user: &AuthenticatedUser) -> CommandMetadata {
    CommandMetadata::for_user(user).with_source("api")
}

fn wants_pdf(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("application/pdf"))
}

fn pdf_response(status: StatusCode, opened: OpenDocumentResult) -> Response {
    let disposition = format!("inline; filename=\"{}\"", opened.document.artifact_ref);
    (
        status,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        opened.content,
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/entities - Company summaries, most recently updated first
pub async fn list_entities(
    State(state): State<EntityAppState>,
    RequireAuth(_user): RequireAuth,
) -> Response {
    match state.list_entities_handler().handle().await {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET /api/entities/:id - Full record with partners
pub async fn get_entity(
    State(state): State<EntityAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_entity_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.get_entity_handler().handle(GetEntityQuery { id }).await {
        Ok(entity) => (StatusCode::OK, Json(entity)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /api/entities - Register a company and produce its first document
///
/// With `Accept: application/pdf` the new document is returned inline
/// instead of the JSON summary, when one was produced.
pub async fn create_entity(
    State(state): State<EntityAppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    Json(req): Json<CreateEntityRequest>,
) -> Response {
    let result = match state
        .create_entity_handler()
        .handle(req.into(), metadata_for(&user))
        .await
    {
        Ok(result) => result,
        Err(e) => return ApiError::from(e).into_response(),
    };

    if wants_pdf(&headers) {
        if let DocumentOutcome::Recorded(doc) = &result.document {
            let query = OpenDocumentQuery {
                entity_id: result.entity.id,
                selector: VersionSelector::Exact(doc.version),
            };
            match state.open_document_handler().handle(query).await {
                Ok(opened) => return pdf_response(StatusCode::CREATED, opened),
                Err(e) => {
                    tracing::warn!(
                        entity_id = %result.entity.id,
                        version = doc.version,
                        error = %e,
                        "Could not stream new document; answering with JSON"
                    );
                }
            }
        }
    }

    let response = CreateEntityResponse::from(&result);
    (StatusCode::CREATED, Json(response)).into_response()
}

/// PUT /api/entities/:id - Patch a company and produce the next document
pub async fn update_entity(
    State(state): State<EntityAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<UpdateEntityRequest>,
) -> Response {
    let id = match parse_entity_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state
        .update_entity_handler()
        .handle(req.into_command(id), metadata_for(&user))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(UpdateEntityResponse::from(&result))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET /api/entities/:id/documents - Version history, highest first
pub async fn list_documents(
    State(state): State<EntityAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let entity_id = match parse_entity_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state
        .list_documents_handler()
        .handle(ListDocumentsQuery { entity_id })
        .await
    {
        Ok(versions) => {
            let response: Vec<DocumentVersionResponse> =
                versions.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET /api/entities/:id/document?version=N - The PDF for version N, or the latest
pub async fn open_document(
    State(state): State<EntityAppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    Query(params): Query<DocumentQuery>,
) -> Response {
    let entity_id = match parse_entity_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    let query = OpenDocumentQuery {
        entity_id,
        selector: VersionSelector::from_query(params.version),
    };
    match state.open_document_handler().handle(query).await {
        Ok(opened) => pdf_response(StatusCode::OK, opened),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_header_negotiates_pdf() {
        let mut headers = HeaderMap::new();
        assert!(!wants_pdf(&headers));

        headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        assert!(!wants_pdf(&headers));

        headers.insert(header::ACCEPT, "application/pdf, */*;q=0.1".parse().unwrap());
        assert!(wants_pdf(&headers));
    }

    #[test]
    fn malformed_entity_id_is_bad_request() {
        let err = parse_entity_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
