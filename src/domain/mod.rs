//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, auth)
//! - `entity` - Company aggregate, partners, patches and audit rows
//! - `document` - Document versions, signatures and generation workflow

pub mod document;
pub mod entity;
pub mod foundation;
