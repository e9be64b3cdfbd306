//! Audit trail rows written alongside every entity change.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{EntityId, Timestamp, UserId};

/// Entity type recorded in audit rows for companies.
pub const COMPANY_ENTITY_TYPE: &str = "company";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row per create/update, committed in the same transaction as the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub action: AuditAction,
    pub actor_id: UserId,
    pub at: Timestamp,
}

impl AuditEntry {
    pub fn company(entity_id: EntityId, action: AuditAction, actor_id: UserId) -> Self {
        Self {
            entity_type: COMPANY_ENTITY_TYPE.to_string(),
            entity_id,
            action,
            actor_id,
            at: Timestamp::now(),
        }
    }
}
