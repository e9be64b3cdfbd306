//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `EntityRepository` - Companies, partners and audit trail
//! - `DocumentVersionRepository` - Append-only document history
//!
//! ## Artifact Ports
//!
//! - `ArtifactStore` - Rendered documents keyed by entity and version
//! - `SignatureStore` - One live signature image per entity
//!
//! ## External Collaborators
//!
//! - `DocumentRenderer` - Template + data record to document bytes
//! - `SessionValidator` - Access token validation

mod artifact_store;
mod document_renderer;
mod document_version_repository;
mod entity_repository;
mod session_validator;
mod signature_store;

pub use artifact_store::{content_checksum, ArtifactStore, StorageError, StoredArtifact};
pub use document_renderer::{DocumentRenderer, RenderError};
pub use document_version_repository::DocumentVersionRepository;
pub use entity_repository::EntityRepository;
pub use session_validator::SessionValidator;
pub use signature_store::SignatureStore;
