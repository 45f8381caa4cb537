#![deny(missing_docs)]
//! docsmith HTML engine: renders processed documents to page markup.

/// Output buffer and scope tracking.
pub mod context;
/// Block and mdast rendering.
pub mod render;

use docsmith_core::ProcessedDocument;

pub use context::{HtmlWriter, Scope};
pub use render::{language_class, render_block, render_blocks, render_code, render_node};

/// Renders the body of a processed document.
pub fn render_document(document: &ProcessedDocument) -> String {
    render_blocks(&document.blocks)
}
