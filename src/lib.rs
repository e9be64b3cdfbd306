#![recursion_limit = "256"]
//! Company Docs - company registry with versioned proposal documents.
//!
//! Every create or update of a company produces a new, immutable PDF version
//! rendered from a template, stored as an artifact, and recorded in a
//! per-company history.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
