//! In-memory repository adapters for tests and local development.

mod document_version_repository;
mod entity_repository;

pub use document_version_repository::InMemoryDocumentVersionRepository;
pub use entity_repository::InMemoryEntityRepository;
