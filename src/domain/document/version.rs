//! Document version history types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{EntityId, Timestamp, UserId};

/// First version number of every entity's document history.
pub const FIRST_VERSION: u32 = 1;

/// Version that follows the highest recorded one, or `FIRST_VERSION`.
pub fn next_version_after(max_recorded: Option<u32>) -> u32 {
    match max_recorded {
        Some(max) => max.saturating_add(1),
        None => FIRST_VERSION,
    }
}

/// Immutable record of a rendered document.
///
/// The artifact named by `artifact_ref` exists in the artifact store for as
/// long as this record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub entity_id: EntityId,
    pub version: u32,
    pub artifact_ref: String,
    /// Hex-encoded SHA-256 of the artifact bytes.
    pub checksum: String,
    pub size_bytes: u64,
    pub created_at: Timestamp,
    pub created_by: UserId,
}

/// Which version of an entity's document to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    Exact(u32),
    Latest,
}

impl VersionSelector {
    /// Interprets a `version` query parameter: absent or `0` means latest.
    pub fn from_query(version: Option<u32>) -> Self {
        match version {
            None | Some(0) => VersionSelector::Latest,
            Some(v) => VersionSelector::Exact(v),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Exact(v) => write!(f, "v{}", v),
            VersionSelector::Latest => f.write_str("latest"),
        }
    }
}
