//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, error types, and the authenticated actor
//! used by every other layer.

mod auth;
mod command;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EntityId, UserId};
pub use timestamp::Timestamp;
