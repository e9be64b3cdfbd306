//! Document generation: version allocation, signatures and the
//! orchestrated render-and-record stage.

mod generation;
mod signature_manager;
mod version_allocator;

pub use generation::{DocumentGenerationConfig, DocumentGenerator, DEFAULT_TEMPLATE_ID};
pub use signature_manager::SignatureManager;
pub use version_allocator::VersionAllocator;
