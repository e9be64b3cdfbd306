//! Versioned document domain module.
//!
//! # Module Structure
//!
//! - `version` - DocumentVersion records and version selection
//! - `signature` - Signature data-URL parsing
//! - `workflow` - Generation workflow states and failure policy
//! - `render_data` - Template data record built from an entity

mod render_data;
mod signature;
mod version;
mod workflow;

pub use render_data::{build_render_data, EmbeddedSignature};
pub use signature::{ImageFormat, SignatureImage};
pub use version::{next_version_after, DocumentVersion, VersionSelector, FIRST_VERSION};
pub use workflow::{DocumentFlow, DocumentOutcome, RenderFailurePolicy, WorkflowState};
