//! Document renderer adapters.
//!
//! - `ProcessDocumentRenderer` - fills a mustache HTML template and converts it with
//!   an external HTML-to-PDF command
//! - `MockDocumentRenderer` - deterministic in-process renderer for tests

mod mock;
mod process_renderer;
pub mod template;

pub use mock::{MockDocumentRenderer, RenderCall};
pub use process_renderer::{ProcessDocumentRenderer, DEFAULT_RENDER_COMMAND};
pub use template::render_template;
