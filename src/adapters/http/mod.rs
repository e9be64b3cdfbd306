//! HTTP adapters - REST API over axum.

pub mod entity;
pub mod error;
pub mod middleware;
pub mod router;

pub use entity::{entity_routes, EntityAppState};
pub use error::{ApiError, ErrorResponse};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use router::{api_router, health, with_server_layers};
