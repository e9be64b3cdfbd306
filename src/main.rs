//! Company Docs server
//!
//! Loads configuration from `COMPANY_DOCS__*` environment variables (and a
//! `.env` file when present), connects to PostgreSQL, and serves the REST API.
//!
//! ## HTTP API
//!
//! - `GET /health` - Health check
//! - `GET|POST /api/entities` - List or register companies
//! - `GET|PUT /api/entities/:id` - Read or update a company
//! - `GET /api/entities/:id/documents` - Document history
//! - `GET /api/entities/:id/document?version=N` - Document PDF

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use company_docs::adapters::auth::JwtSessionValidator;
use company_docs::adapters::http::{api_router, with_server_layers, EntityAppState};
use company_docs::adapters::postgres::{PostgresDocumentVersionRepository, PostgresEntityRepository};
use company_docs::adapters::renderer::{ProcessDocumentRenderer, DEFAULT_RENDER_COMMAND};
use company_docs::adapters::storage::{LocalArtifactStore, LocalSignatureStore};
use company_docs::application::{DocumentGenerator, SignatureManager};
use company_docs::config::{AppConfig, RendererConfig};
use company_docs::ports::{ArtifactStore, DocumentVersionRepository, EntityRepository};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_renderer(config: &RendererConfig) -> ProcessDocumentRenderer {
    let renderer = ProcessDocumentRenderer::new(&config.template_dir);
    let renderer = match config.args_list() {
        Some(args) => renderer.with_command(&config.command, args),
        None if config.command == DEFAULT_RENDER_COMMAND => renderer,
        None => renderer.with_command(&config.command, Vec::new()),
    };
    match &config.debug_html_path {
        Some(path) => renderer.with_debug_html(path),
        None => renderer,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    info!(
        environment = ?config.server.environment,
        storage_root = %config.storage.root_dir.display(),
        template_dir = %config.renderer.template_dir.display(),
        "Starting company-docs"
    );

    let pool = config.database.connect().await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let artifacts: Arc<dyn ArtifactStore> = Arc::new(
        LocalArtifactStore::new(config.storage.documents_dir())
            .with_max_bytes(config.storage.max_artifact_bytes),
    );
    let entities: Arc<dyn EntityRepository> =
        Arc::new(PostgresEntityRepository::new(pool.clone()));
    let history: Arc<dyn DocumentVersionRepository> = Arc::new(
        PostgresDocumentVersionRepository::new(pool.clone(), artifacts.clone()),
    );
    let signatures = SignatureManager::new(
        Arc::new(LocalSignatureStore::new(config.storage.signatures_dir())),
        entities.clone(),
    );
    let generator = Arc::new(DocumentGenerator::new(
        Arc::new(build_renderer(&config.renderer)),
        artifacts.clone(),
        history.clone(),
        signatures.clone(),
        config.document_generation(),
    ));
    let validator = Arc::new(JwtSessionValidator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.clone(),
        config.auth.leeway_secs,
    ));

    let state = EntityAppState {
        entities,
        history,
        artifacts,
        signatures,
        generator,
    };
    let app = with_server_layers(api_router(state, validator), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
