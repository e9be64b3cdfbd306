//! Integration tests for company and document HTTP endpoints.
//!
//! Drives the full router (auth middleware, handlers, document generation)
//! against in-memory repositories, filesystem stores in a temp directory,
//! and the mock renderer.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use company_docs::adapters::auth::MockSessionValidator;
use company_docs::adapters::http::{api_router, EntityAppState};
use company_docs::adapters::memory::{InMemoryDocumentVersionRepository, InMemoryEntityRepository};
use company_docs::adapters::renderer::MockDocumentRenderer;
use company_docs::adapters::storage::{LocalArtifactStore, LocalSignatureStore};
use company_docs::application::{DocumentGenerationConfig, DocumentGenerator, SignatureManager};
use company_docs::domain::foundation::Role;
use company_docs::ports::RenderError;

const EDITOR: &str = "editor-token";
const VIEWER: &str = "viewer-token";
const PNG_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    _temp: TempDir,
    renderer: Arc<MockDocumentRenderer>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let artifacts = Arc::new(LocalArtifactStore::new(temp.path().join("documents")));
        let entities = Arc::new(InMemoryEntityRepository::new());
        let history = Arc::new(InMemoryDocumentVersionRepository::new(artifacts.clone()));
        let renderer = Arc::new(MockDocumentRenderer::new());
        let signatures = SignatureManager::new(
            Arc::new(LocalSignatureStore::new(temp.path().join("signatures"))),
            entities.clone(),
        );
        let generator = Arc::new(DocumentGenerator::new(
            renderer.clone(),
            artifacts.clone(),
            history.clone(),
            signatures.clone(),
            DocumentGenerationConfig::default(),
        ));
        let validator = Arc::new(
            MockSessionValidator::new()
                .with_test_user(EDITOR, "editor-1", Role::Editor)
                .with_test_user(VIEWER, "viewer-1", Role::Viewer),
        );

        let state = EntityAppState {
            entities,
            history,
            artifacts,
            signatures,
            generator,
        };

        Self {
            _temp: temp,
            renderer,
            router: api_router(state, validator),
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, token: &str) -> Response {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post_json(&self, uri: &str, token: &str, body: Value) -> Response {
        self.send(json_request("POST", uri, token, body)).await
    }

    async fn put_json(&self, uri: &str, token: &str, body: Value) -> Response {
        self.send(json_request("PUT", uri, token, body)).await
    }

    /// Creates Acme and returns its id.
    async fn create_acme(&self, extra: Value) -> String {
        let mut body = acme_body();
        if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        let response = self.post_json("/api/entities", EDITOR, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}

fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn acme_body() -> Value {
    json!({
        "fantasyName": "Acme",
        "taxId": "12345678000190",
        "partners": [{"name": "Ana", "taxId": "111"}]
    })
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn versions(list: &Value) -> Vec<u64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|d| d["version"].as_u64().unwrap())
        .collect()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_returns_first_version_and_persists_partners() {
    let app = TestApp::new();

    let response = app.post_json("/api/entities", EDITOR, acme_body()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["id"].as_str().unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["version"], 1);
    assert_eq!(body["pdf"], format!("company_{}_v1.pdf", id));

    let entity = body_json(app.get(&format!("/api/entities/{}", id), VIEWER).await).await;
    assert_eq!(entity["fantasyName"], "Acme");
    assert_eq!(entity["partners"][0]["name"], "Ana");
}

#[tokio::test]
async fn create_with_pdf_accept_returns_document_bytes() {
    let app = TestApp::new();
    let mut request = json_request("POST", "/api/entities", EDITOR, acme_body());
    request
        .headers_mut()
        .insert(header::ACCEPT, "application/pdf".parse().unwrap());

    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("inline; filename=\"company_"));
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn create_render_failure_keeps_company_without_document() {
    let app = TestApp::new();
    app.renderer
        .fail_with(RenderError::EngineFailed("converter crashed".into()));

    let response = app.post_json("/api/entities", EDITOR, acme_body()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["pdf"].is_null());
    assert_eq!(body["version"], 1);
    let id = body["id"].as_str().unwrap();

    let entity = app.get(&format!("/api/entities/{}", id), EDITOR).await;
    assert_eq!(entity.status(), StatusCode::OK);
    let docs = body_json(app.get(&format!("/api/entities/{}/documents", id), EDITOR).await).await;
    assert!(docs.as_array().unwrap().is_empty());

    let missing = app.get(&format!("/api/entities/{}/document", id), EDITOR).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["code"], "DOCUMENT_NOT_FOUND");
}

#[tokio::test]
async fn create_without_name_is_rejected_and_nothing_is_stored() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/entities", EDITOR, json!({"taxId": "12345678000190"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
    let list = body_json(app.get("/api/entities", EDITOR).await).await;
    assert!(list.as_array().unwrap().is_empty());
    assert_eq!(app.renderer.call_count(), 0);
}

// =============================================================================
// Update and history
// =============================================================================

#[tokio::test]
async fn update_produces_next_version_and_history_is_highest_first() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;

    let response = app
        .put_json(&format!("/api/entities/{}", id), EDITOR, json!({"city": "Curitiba"}))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true, "version": 2}));

    let docs = body_json(app.get(&format!("/api/entities/{}/documents", id), EDITOR).await).await;
    assert_eq!(versions(&docs), vec![2, 1]);
    assert_eq!(docs[0]["artifactRef"], format!("company_{}_v2.pdf", id));
}

#[tokio::test]
async fn document_endpoint_resolves_latest_and_exact_versions() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;
    app.put_json(&format!("/api/entities/{}", id), EDITOR, json!({"city": "Curitiba"}))
        .await;

    let latest = app
        .get(&format!("/api/entities/{}/document?version=0", id), VIEWER)
        .await;
    assert_eq!(latest.status(), StatusCode::OK);
    assert_eq!(latest.headers()[header::CONTENT_TYPE], "application/pdf");
    let latest = String::from_utf8(body_bytes(latest).await).unwrap();
    assert!(latest.contains("Acme v2"));

    let first = app
        .get(&format!("/api/entities/{}/document?version=1", id), VIEWER)
        .await;
    let first = String::from_utf8(body_bytes(first).await).unwrap();
    assert!(first.contains("Acme v1"));

    let missing = app
        .get(&format!("/api/entities/{}/document?version=9", id), VIEWER)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn document_can_be_opened_with_query_token() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;

    let response = app
        .send(
            Request::builder()
                .uri(format!("/api/entities/{}/document?token={}", id, VIEWER))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_reuses_stored_signature() {
    let app = TestApp::new();
    let id = app.create_acme(json!({"signature": PNG_URL})).await;

    app.put_json(&format!("/api/entities/{}", id), EDITOR, json!({"notes": "renewal"}))
        .await;

    let calls = app.renderer.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].data["signature"], "iVBORw0KGgo=");
    assert_eq!(calls[1].data["version"], 2);
}

#[tokio::test]
async fn signature_without_field_changes_is_bad_request() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;

    let response = app
        .put_json(
            &format!("/api/entities/{}", id),
            EDITOR,
            json!({"signatureBase64": PNG_URL}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
    let docs = body_json(app.get(&format!("/api/entities/{}/documents", id), EDITOR).await).await;
    assert_eq!(versions(&docs), vec![1]);
    assert_eq!(app.renderer.call_count(), 1);
}

#[tokio::test]
async fn signature_with_field_change_produces_new_version() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;

    let response = app
        .put_json(
            &format!("/api/entities/{}", id),
            EDITOR,
            json!({"city": "Curitiba", "signatureBase64": PNG_URL}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["version"], 2);
    assert_eq!(app.renderer.calls()[1].data["signature"], "iVBORw0KGgo=");
}

#[tokio::test]
async fn empty_update_is_bad_request() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;

    let response = app
        .put_json(&format!("/api/entities/{}", id), EDITOR, json!({}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn update_render_failure_is_server_error_but_update_is_kept() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;
    app.renderer
        .fail_with(RenderError::EngineFailed("converter crashed".into()));

    let response = app
        .put_json(&format!("/api/entities/{}", id), EDITOR, json!({"city": "Curitiba"}))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "RENDER_FAILED");

    let entity = body_json(app.get(&format!("/api/entities/{}", id), EDITOR).await).await;
    assert_eq!(entity["city"], "Curitiba");
    let docs = body_json(app.get(&format!("/api/entities/{}/documents", id), EDITOR).await).await;
    assert_eq!(versions(&docs), vec![1]);
}

// =============================================================================
// Auth and lookups
// =============================================================================

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .send(Request::builder().uri("/api/entities").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn invalid_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app.get("/api/entities", "forged").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn viewer_can_read_but_not_write() {
    let app = TestApp::new();
    let id = app.create_acme(json!({})).await;

    let create = app.post_json("/api/entities", VIEWER, acme_body()).await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    let update = app
        .put_json(&format!("/api/entities/{}", id), VIEWER, json!({"city": "Curitiba"}))
        .await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);

    let list = body_json(app.get("/api/entities", VIEWER).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(app.renderer.call_count(), 1);
}

#[tokio::test]
async fn unknown_entity_is_not_found() {
    let app = TestApp::new();
    let unknown = "00000000-0000-4000-8000-000000000000";

    let get = app.get(&format!("/api/entities/{}", unknown), EDITOR).await;
    assert_eq!(get.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(get).await["code"], "ENTITY_NOT_FOUND");

    let docs = app.get(&format!("/api/entities/{}/documents", unknown), EDITOR).await;
    assert_eq!(docs.status(), StatusCode::NOT_FOUND);

    let update = app
        .put_json(&format!("/api/entities/{}", unknown), EDITOR, json!({"city": "X"}))
        .await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = TestApp::new();
    let response = app.get("/api/entities/not-a-uuid", EDITOR).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new();

    let response = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}
