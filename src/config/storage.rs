//! Artifact and signature storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::adapters::storage::DEFAULT_MAX_ARTIFACT_BYTES;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory; documents and signatures live in subdirectories
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Largest rendered document accepted, in bytes
    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: u64,
}

impl StorageConfig {
    pub fn documents_dir(&self) -> PathBuf {
        self.root_dir.join("documents")
    }

    pub fn signatures_dir(&self) -> PathBuf {
        self.root_dir.join("signatures")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("COMPANY_DOCS__STORAGE__ROOT_DIR"));
        }
        if self.max_artifact_bytes == 0 {
            return Err(ValidationError::InvalidArtifactSize);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            max_artifact_bytes: default_max_artifact_bytes(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_artifact_bytes() -> u64 {
    DEFAULT_MAX_ARTIFACT_BYTES
}
