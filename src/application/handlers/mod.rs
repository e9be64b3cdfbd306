//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod document;
pub mod entity;

pub use document::{
    ListDocumentsHandler, ListDocumentsQuery, OpenDocumentHandler, OpenDocumentQuery,
    OpenDocumentResult,
};
pub use entity::{
    CreateEntityCommand, CreateEntityError, CreateEntityHandler, CreateEntityResult,
    GetEntityHandler, GetEntityQuery, ListEntitiesHandler, UpdateEntityCommand,
    UpdateEntityError, UpdateEntityHandler, UpdateEntityResult,
};
