//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `COMPANY_DOCS` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use company_docs::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod documents;
mod error;
mod renderer;
mod server;
mod storage;

pub use auth::{AuthConfig, MIN_JWT_SECRET_LEN};
pub use database::DatabaseConfig;
pub use documents::DocumentsConfig;
pub use error::{ConfigError, ValidationError};
pub use renderer::RendererConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

use crate::application::DocumentGenerationConfig;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Access token verification
    pub auth: AuthConfig,

    /// Artifact and signature directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// External HTML-to-PDF renderer
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Render failure policies and version allocation retries
    #[serde(default)]
    pub documents: DocumentsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `COMPANY_DOCS__*` variables.
    ///
    /// - `COMPANY_DOCS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COMPANY_DOCS__DATABASE__URL=...` -> `database.url = ...`
    /// - `COMPANY_DOCS__DOCUMENTS__ON_UPDATE_RENDER_FAILURE=tolerate`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COMPANY_DOCS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.storage.validate()?;
        self.renderer.validate()?;
        self.documents.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Settings for the document generation stage
    pub fn document_generation(&self) -> DocumentGenerationConfig {
        DocumentGenerationConfig {
            template_id: self.renderer.template_id.clone(),
            render_timeout: self.renderer.timeout(),
            max_concurrent_renders: self.renderer.max_concurrent,
            max_version_attempts: self.documents.max_version_attempts,
            create_policy: self.documents.on_create_render_failure,
            update_policy: self.documents.on_update_render_failure,
        }
    }
}
