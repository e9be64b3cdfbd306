//! Document generation workflow states and failure policy.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DocumentVersion;

/// Stages logged once the entity has committed.
///
/// ```text
/// Committed -> RenderingDocument -> { DocumentRecorded | RenderFailed }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Committed,
    RenderingDocument,
    DocumentRecorded,
    RenderFailed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowState::Committed => "committed",
            WorkflowState::RenderingDocument => "rendering_document",
            WorkflowState::DocumentRecorded => "document_recorded",
            WorkflowState::RenderFailed => "render_failed",
        };
        f.write_str(s)
    }
}

/// Which request flow produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFlow {
    Create,
    Update,
}

impl fmt::Display for DocumentFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFlow::Create => f.write_str("create"),
            DocumentFlow::Update => f.write_str("update"),
        }
    }
}

/// What a flow does when document generation fails after the entity committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailurePolicy {
    /// Log the failure and answer success with no document.
    Tolerate,
    /// Surface the failure to the caller as a server error.
    Fail,
}

/// Result of the document stage of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Recorded(DocumentVersion),
    /// `version` is the number allocated for the failed attempt, if any.
    RenderFailed { version: Option<u32>, reason: String },
}

impl DocumentOutcome {
    pub fn state(&self) -> WorkflowState {
        match self {
            DocumentOutcome::Recorded(_) => WorkflowState::DocumentRecorded,
            DocumentOutcome::RenderFailed { .. } => WorkflowState::RenderFailed,
        }
    }

    /// The recorded version, or the one allocated for a failed attempt.
    pub fn version(&self) -> Option<u32> {
        match self {
            DocumentOutcome::Recorded(doc) => Some(doc.version),
            DocumentOutcome::RenderFailed { version, .. } => *version,
        }
    }

    pub fn recorded(&self) -> Option<&DocumentVersion> {
        match self {
            DocumentOutcome::Recorded(doc) => Some(doc),
            DocumentOutcome::RenderFailed { .. } => None,
        }
    }
}
