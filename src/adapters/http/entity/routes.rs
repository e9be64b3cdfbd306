//! Axum router for company and document endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_entity, get_entity, list_documents, list_entities, open_document, update_entity,
    EntityAppState,
};

/// Routes mounted at `/api/entities`.
///
/// - `GET /` - summaries
/// - `POST /` - create (editor, admin)
/// - `GET /:id` - full record
/// - `PUT /:id` - update (editor, admin)
/// - `GET /:id/documents` - version history
/// - `GET /:id/document?version=N` - PDF bytes
pub fn entity_routes() -> Router<EntityAppState> {
    Router::new()
        .route("/", post(create_entity).get(list_entities))
        .route("/:id", get(get_entity).put(update_entity))
        .route("/:id/documents", get(list_documents))
        .route("/:id/document", get(open_document))
}
