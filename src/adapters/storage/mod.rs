//! Storage Adapters
//!
//! Filesystem implementations of the artifact ports.
//!
//! ## Available Adapters
//!
//! - **LocalArtifactStore** - Rendered documents, one file per entity version
//! - **LocalSignatureStore** - One signature image per entity
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{LocalArtifactStore, LocalSignatureStore};
//!
//! let documents = LocalArtifactStore::new("./storage/documents");
//! let signatures = LocalSignatureStore::new("./storage/signatures");
//! ```

mod atomic;
mod local_artifact_store;
mod local_signature_store;

pub use local_artifact_store::{LocalArtifactStore, DEFAULT_MAX_ARTIFACT_BYTES};
pub use local_signature_store::LocalSignatureStore;
