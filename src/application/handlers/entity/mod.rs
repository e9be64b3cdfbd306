//! Company command and query handlers.

use crate::domain::foundation::{CommandMetadata, Role};

// Command handlers
mod create_entity;
mod update_entity;

// Query handlers
mod get_entity;
mod list_entities;

pub use create_entity::{
    CreateEntityCommand, CreateEntityError, CreateEntityHandler, CreateEntityResult,
};
pub use get_entity::{GetEntityHandler, GetEntityQuery};
pub use list_entities::ListEntitiesHandler;
pub use update_entity::{
    UpdateEntityCommand, UpdateEntityError, UpdateEntityHandler, UpdateEntityResult,
};

/// True when the actor may create or modify companies.
fn ensure_writer(metadata: &CommandMetadata) -> bool {
    Role::WRITERS.contains(&metadata.role)
}
