//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers orchestrate domain operations through ports. The `document`
//! module holds the document stage shared by the create and update flows.

pub mod document;
pub mod handlers;

pub use document::{
    DocumentGenerationConfig, DocumentGenerator, SignatureManager, VersionAllocator,
    DEFAULT_TEMPLATE_ID,
};
pub use handlers::{
    CreateEntityCommand, CreateEntityError, CreateEntityHandler, CreateEntityResult,
    GetEntityHandler, GetEntityQuery, ListDocumentsHandler, ListDocumentsQuery,
    ListEntitiesHandler, OpenDocumentHandler, OpenDocumentQuery, OpenDocumentResult,
    UpdateEntityCommand, UpdateEntityError, UpdateEntityHandler, UpdateEntityResult,
};
