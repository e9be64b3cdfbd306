//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresEntityRepository` - Companies, partners and audit rows
//! - `PostgresDocumentVersionRepository` - Version history coordinated with the artifact store

mod document_version_repository;
mod entity_repository;

pub use document_version_repository::PostgresDocumentVersionRepository;
pub use entity_repository::PostgresEntityRepository;
