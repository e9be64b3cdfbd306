//! Artifact Store port - persistence for rendered documents.
//!
//! Artifacts are keyed by entity id and version. Names are deterministic so
//! the same `(entity, version)` always maps to the same artifact, and two
//! different pairs never collide.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::document::VersionSelector;
use crate::domain::foundation::{DomainError, EntityId, ErrorCode};

/// Port for rendered document artifacts.
///
/// # Contract
///
/// Implementations must:
/// - Write atomically (readers never observe partial content)
/// - Treat a repeated write of the same `(entity, version)` as an overwrite
/// - Create missing directories lazily, tolerating concurrent creation
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Canonical artifact reference for a version, e.g. `company_<id>_v3.pdf`.
    fn path_for(&self, entity_id: &EntityId, version: u32) -> String;

    /// Writes the artifact and returns its reference.
    async fn write(
        &self,
        entity_id: &EntityId,
        version: u32,
        content: &[u8],
    ) -> Result<String, StorageError>;

    /// Reads a version, or the highest stored version for `Latest`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no matching artifact exists.
    async fn open(
        &self,
        entity_id: &EntityId,
        selector: VersionSelector,
    ) -> Result<StoredArtifact, StorageError>;

    async fn exists(&self, entity_id: &EntityId, version: u32) -> Result<bool, StorageError>;
}

/// An artifact read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub artifact_ref: String,
    pub version: u32,
    pub content: Vec<u8>,
}

/// Hex-encoded SHA-256 of artifact content.
pub fn content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Errors raised by artifact and signature storage.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Artifact not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Artifact too large: {size_bytes} bytes (max: {max_bytes})")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

impl StorageError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::TooLarge {
            size_bytes,
            max_bytes,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied {
                path: err.to_string(),
            },
            _ => StorageError::io(err.to_string()),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        let code = if err.is_not_found() {
            ErrorCode::DocumentNotFound
        } else {
            ErrorCode::StorageError
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_sha256_hex() {
        assert_eq!(
            content_checksum(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err: StorageError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_not_found());
    }

    #[test]
    fn io_other_maps_to_io() {
        let err: StorageError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn not_found_becomes_document_not_found() {
        let err: DomainError = StorageError::not_found("company_x_v1.pdf").into();
        assert_eq!(err.code, ErrorCode::DocumentNotFound);
    }

    #[test]
    fn too_large_becomes_storage_error() {
        let err: DomainError = StorageError::too_large(10, 5).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(err.message.contains("10 bytes"));
    }
}
