//! HTTP adapter for companies and their documents.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::EntityAppState;
pub use routes::entity_routes;
