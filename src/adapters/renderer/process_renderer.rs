//! HTML-to-PDF renderer backed by an external command.
//!
//! The template `{template_dir}/{template_id}.html` is filled with the data
//! record and the resulting HTML is piped to the configured command (by
//! default `wkhtmltopdf - -`), whose stdout is the document.
//!
//! The child is spawned with `kill_on_drop`, so a caller that abandons the
//! render future (for example on timeout) also terminates the process.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::template::render_template;
use crate::ports::{DocumentRenderer, RenderError};

pub const DEFAULT_RENDER_COMMAND: &str = "wkhtmltopdf";

#[derive(Debug, Clone)]
pub struct ProcessDocumentRenderer {
    template_dir: PathBuf,
    command: String,
    args: Vec<String>,
    debug_html_path: Option<PathBuf>,
}

impl ProcessDocumentRenderer {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            command: DEFAULT_RENDER_COMMAND.to_string(),
            args: default_args(),
            debug_html_path: None,
        }
    }

    /// Sets the converter command and its arguments.
    pub fn with_command(mut self, command: impl Into<String>, args: Vec<String>) -> Self {
        self.command = command.into();
        self.args = args;
        self
    }

    /// Keeps a copy of the last rendered HTML at `path` for troubleshooting.
    pub fn with_debug_html(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_html_path = Some(path.into());
        self
    }

    fn template_path(&self, template_id: &str) -> Result<PathBuf, RenderError> {
        let valid = !template_id.is_empty()
            && template_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RenderError::TemplateNotFound(template_id.to_string()));
        }
        Ok(self.template_dir.join(format!("{}.html", template_id)))
    }

    /// Loads and fills the template.
    pub async fn render_html(&self, template_id: &str, data: &Value) -> Result<String, RenderError> {
        let path = self.template_path(template_id)?;
        let source = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RenderError::TemplateNotFound(path.display().to_string()),
            _ => RenderError::Template(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        // The engine panics on some value shapes (e.g. a string section).
        let data = data.clone();
        tokio::task::spawn_blocking(move || render_template(&source, &data))
            .await
            .map_err(|e| RenderError::Template(format!("{}: {}", path.display(), e)))?
            .map_err(|e| match e {
                RenderError::Template(msg) => {
                    RenderError::Template(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })
    }

    async fn write_debug_html(&self, html: &str) {
        let Some(path) = &self.debug_html_path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        if let Err(e) = tokio::fs::write(path, html).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write debug HTML");
        }
    }

    async fn convert(&self, html: String) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RenderError::EngineFailed(format!("Failed to start {}: {}", self.command, e))
            })?;

        // Feed stdin concurrently so a large document cannot fill both pipes.
        let stdin = child.stdin.take();
        let feeder = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(html.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let (fed, output) = tokio::join!(feeder, child.wait_with_output());

        let output = output.map_err(|e| {
            RenderError::EngineFailed(format!("{} execution failed: {}", self.command, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::EngineFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        if let Err(e) = fed {
            return Err(RenderError::EngineFailed(format!(
                "Failed to write to {}: {}",
                self.command, e
            )));
        }

        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(output.stdout)
    }
}

fn default_args() -> Vec<String> {
    ["--quiet", "--page-size", "A4", "--encoding", "utf-8", "-", "-"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[async_trait]
impl DocumentRenderer for ProcessDocumentRenderer {
    async fn render(&self, template_id: &str, data: &Value) -> Result<Vec<u8>, RenderError> {
        let html = self.render_html(template_id, data).await?;
        self.write_debug_html(&html).await;

        tracing::debug!(template_id, command = %self.command, "Rendering document");
        self.convert(html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::build_render_data;
    use crate::domain::entity::{BusinessEntity, EntityFields, Partner};
    use crate::domain::foundation::Timestamp;
    use serde_json::json;
    use tempfile::TempDir;

    fn renderer_with_template(body: &str) -> (TempDir, ProcessDocumentRenderer) {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("proposal.html"), body).unwrap();
        let renderer = ProcessDocumentRenderer::new(temp.path());
        (temp, renderer)
    }

    #[tokio::test]
    async fn render_html_fills_template() {
        let (_temp, renderer) = renderer_with_template("<h1>{{fantasy_name}}</h1>");
        let html = renderer
            .render_html("proposal", &json!({"fantasy_name": "Acme"}))
            .await
            .unwrap();
        assert_eq!(html, "<h1>Acme</h1>");
    }

    #[tokio::test]
    async fn shipped_proposal_template_renders_entity_data() {
        let renderer =
            ProcessDocumentRenderer::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"));
        let mut fields = EntityFields::named("Acme & Co");
        fields.city = Some("Curitiba".into());
        fields.notes = Some("renewal".into());
        let entity = BusinessEntity::register(fields, vec![Partner::new("Ana", "111")]).unwrap();
        let data = build_render_data(&entity, 2, None, Timestamp::now());

        let html = renderer.render_html("proposal", &data).await.unwrap();

        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains("Ana"));
        assert!(html.contains("renewal"));
        assert!(html.contains("Curitiba, "));
        assert!(!html.contains("<img"));
    }

    #[tokio::test]
    async fn missing_template_is_reported() {
        let (_temp, renderer) = renderer_with_template("x");
        let err = renderer.render_html("other", &json!({})).await.unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(_)));
    }

    #[tokio::test]
    async fn template_id_cannot_escape_directory() {
        let (_temp, renderer) = renderer_with_template("x");
        let err = renderer.render_html("../secret", &json!({})).await.unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(_)));
    }

    #[tokio::test]
    async fn broken_template_is_a_template_error() {
        let (_temp, renderer) = renderer_with_template("{{#open}}never closed");
        let err = renderer.render_html("proposal", &json!({})).await.unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipes_html_through_command() {
        let (temp, renderer) = renderer_with_template("doc {{version}}");
        let debug = temp.path().join("debug").join("last.html");
        let renderer = renderer
            .with_command("cat", vec![])
            .with_debug_html(&debug);

        let bytes = renderer.render("proposal", &json!({"version": 2})).await.unwrap();

        assert_eq!(bytes, b"doc 2");
        assert_eq!(std::fs::read_to_string(debug).unwrap(), "doc 2");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_engine_failure() {
        let (_temp, renderer) = renderer_with_template("doc");
        let renderer = renderer.with_command("false", vec![]);

        let err = renderer.render("proposal", &json!({})).await.unwrap_err();

        assert!(matches!(err, RenderError::EngineFailed(_)));
    }

    #[tokio::test]
    async fn missing_command_is_engine_failure() {
        let (_temp, renderer) = renderer_with_template("doc");
        let renderer = renderer.with_command("definitely-not-a-real-binary-xyz", vec![]);

        let err = renderer.render("proposal", &json!({})).await.unwrap_err();

        assert!(matches!(err, RenderError::EngineFailed(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn empty_output_is_rejected() {
        let (_temp, renderer) = renderer_with_template("doc");
        let renderer = renderer.with_command("true", vec![]);

        let err = renderer.render("proposal", &json!({})).await.unwrap_err();

        assert!(matches!(err, RenderError::EngineFailed(_) | RenderError::EmptyOutput));
    }
}
