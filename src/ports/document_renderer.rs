//! Document renderer port.
//!
//! Turns a template id plus a JSON data record into document bytes. Each
//! call may spawn an external process, so callers bound concurrency and
//! wall-clock time around it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, template_id: &str, data: &Value) -> Result<Vec<u8>, RenderError>;
}

/// Failures of the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Render engine failed: {0}")]
    EngineFailed(String),

    #[error("Render timed out after {0} seconds")]
    Timeout(u64),

    #[error("Render engine produced no output")]
    EmptyOutput,
}

impl From<RenderError> for DomainError {
    fn from(err: RenderError) -> Self {
        DomainError::new(ErrorCode::RenderFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_render_failed() {
        let err: DomainError = RenderError::EmptyOutput.into();
        assert_eq!(err.code, ErrorCode::RenderFailed);
    }

    #[test]
    fn timeout_message_includes_seconds() {
        assert_eq!(
            RenderError::Timeout(30).to_string(),
            "Render timed out after 30 seconds"
        );
    }
}
