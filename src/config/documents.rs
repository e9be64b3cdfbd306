//! Document workflow configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::document::RenderFailurePolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    /// What a failed render does to a create request
    #[serde(default = "default_create_policy")]
    pub on_create_render_failure: RenderFailurePolicy,

    /// What a failed render does to an update request
    #[serde(default = "default_update_policy")]
    pub on_update_render_failure: RenderFailurePolicy,

    /// Allocation attempts before a version conflict is reported
    #[serde(default = "default_max_version_attempts")]
    pub max_version_attempts: u32,
}

impl DocumentsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_version_attempts == 0 || self.max_version_attempts > 20 {
            return Err(ValidationError::InvalidVersionAttempts);
        }
        Ok(())
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            on_create_render_failure: default_create_policy(),
            on_update_render_failure: default_update_policy(),
            max_version_attempts: default_max_version_attempts(),
        }
    }
}

fn default_create_policy() -> RenderFailurePolicy {
    RenderFailurePolicy::Tolerate
}

fn default_update_policy() -> RenderFailurePolicy {
    RenderFailurePolicy::Fail
}

fn default_max_version_attempts() -> u32 {
    3
}
