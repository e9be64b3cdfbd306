//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - Entity and document-history repositories over sqlx
//! - `memory` - In-memory repositories for tests and local runs
//! - `storage` - Filesystem artifact and signature stores
//! - `renderer` - Template + external HTML-to-PDF process
//! - `auth` - JWT session validation
//! - `http` - axum REST API

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod renderer;
pub mod storage;
