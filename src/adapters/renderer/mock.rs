//! Mock document renderer for testing.
//!
//! Produces small deterministic "PDF" bytes derived from the data record and
//! records every call. Can be switched to fail or to stall.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::{DocumentRenderer, RenderError};

/// A recorded render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub template_id: String,
    pub data: Value,
}

#[derive(Debug, Default)]
pub struct MockDocumentRenderer {
    calls: Mutex<Vec<RenderCall>>,
    force_error: Mutex<Option<RenderError>>,
    delay: Mutex<Option<Duration>>,
}

impl MockDocumentRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every render fails with `error` until `clear_error` is called.
    pub fn with_error(self, error: RenderError) -> Self {
        self.fail_with(error);
        self
    }

    /// Every render sleeps for `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = Some(delay);
        self
    }

    pub fn fail_with(&self, error: RenderError) {
        *self.force_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Bytes the mock returns for a data record.
    pub fn expected_output(data: &Value) -> Vec<u8> {
        let name = data.get("fantasy_name").and_then(Value::as_str).unwrap_or("");
        let version = data.get("version").and_then(Value::as_u64).unwrap_or(0);
        let signature = data.get("signature").and_then(Value::as_str).unwrap_or("-");
        format!("%PDF-1.4\n% {} v{} sig:{}\n%%EOF\n", name, version, signature).into_bytes()
    }
}

#[async_trait]
impl DocumentRenderer for MockDocumentRenderer {
    async fn render(&self, template_id: &str, data: &Value) -> Result<Vec<u8>, RenderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RenderCall {
                template_id: template_id.to_string(),
                data: data.clone(),
            });

        let delay = *self.delay.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let forced = self
            .force_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }

        Ok(Self::expected_output(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn renders_deterministic_bytes_and_records_calls() {
        let renderer = MockDocumentRenderer::new();
        let data = json!({"fantasy_name": "Acme", "version": 1});

        let bytes = renderer.render("proposal", &data).await.unwrap();

        assert_eq!(bytes, MockDocumentRenderer::expected_output(&data));
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(renderer.calls()[0].template_id, "proposal");
    }

    #[tokio::test]
    async fn forced_error_is_returned_until_cleared() {
        let renderer =
            MockDocumentRenderer::new().with_error(RenderError::EngineFailed("crash".into()));

        assert!(renderer.render("proposal", &json!({})).await.is_err());
        renderer.clear_error();
        assert!(renderer.render("proposal", &json!({})).await.is_ok());
        assert_eq!(renderer.call_count(), 2);
    }
}
