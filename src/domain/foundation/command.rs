//! Command infrastructure for application handlers.
//!
//! Every mutating handler takes a `CommandMetadata` alongside its command so
//! the acting user and request correlation travel together into audit rows
//! and tracing spans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthenticatedUser, Role, UserId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command. Recorded as `created_by` and in audit rows.
    pub user_id: UserId,

    /// Role the actor held when the command was issued.
    pub role: Role,

    /// Links log lines for a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g. "api", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            correlation_id: None,
            source: None,
        }
    }

    /// Builds metadata for an authenticated actor.
    pub fn for_user(user: &AuthenticatedUser) -> Self {
        Self::new(user.id.clone(), user.role)
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Editor fixture for handler tests.
    pub fn test_fixture() -> Self {
        Self::new(UserId::new("test-user-123").unwrap(), Role::Editor)
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
