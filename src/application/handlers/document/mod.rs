//! Document query handlers.

mod list_documents;
mod open_document;

pub use list_documents::{ListDocumentsHandler, ListDocumentsQuery};
pub use open_document::{OpenDocumentHandler, OpenDocumentQuery, OpenDocumentResult};
