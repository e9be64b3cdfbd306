//! Document renderer configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::renderer::DEFAULT_RENDER_COMMAND;
use crate::application::DEFAULT_TEMPLATE_ID;

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// HTML-to-PDF converter reading stdin and writing stdout
    #[serde(default = "default_command")]
    pub command: String,

    /// Converter arguments (whitespace-separated); defaults suit wkhtmltopdf
    pub args: Option<String>,

    /// Directory holding `{template_id}.html` templates
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    #[serde(default = "default_template_id")]
    pub template_id: String,

    /// Where to keep the last rendered HTML, if anywhere
    pub debug_html_path: Option<PathBuf>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Renders allowed to run at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Explicit converter arguments, if configured
    pub fn args_list(&self) -> Option<Vec<String>> {
        self.args
            .as_ref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.command.trim().is_empty() {
            return Err(ValidationError::MissingRequired("COMPANY_DOCS__RENDERER__COMMAND"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidRenderTimeout);
        }
        if self.max_concurrent == 0 || self.max_concurrent > 64 {
            return Err(ValidationError::InvalidRenderConcurrency);
        }
        let valid_id = !self.template_id.is_empty()
            && self
                .template_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_id {
            return Err(ValidationError::InvalidTemplateId(self.template_id.clone()));
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: None,
            template_dir: default_template_dir(),
            template_id: default_template_id(),
            debug_html_path: None,
            timeout_secs: default_timeout(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_command() -> String {
    DEFAULT_RENDER_COMMAND.to_string()
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("./templates")
}

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.command, "wkhtmltopdf");
        assert_eq!(config.template_id, "proposal");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.args_list().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_args_split_on_whitespace() {
        let config = RendererConfig {
            args: Some("--quiet  -s A4 - -".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.args_list().unwrap(),
            vec!["--quiet", "-s", "A4", "-", "-"]
        );
    }

    #[test]
    fn test_template_id_must_be_plain() {
        let config = RendererConfig {
            template_id: "../etc/passwd".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemplateId(_))
        ));
    }

    #[test]
    fn test_concurrency_bounds() {
        let config = RendererConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRenderConcurrency));
    }
}
