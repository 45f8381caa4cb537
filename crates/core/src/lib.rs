#![deny(missing_docs)]
//! Docsmith core: file trees, document classification, slugs, and the
//! heading and split-view transforms applied to every documentation page.

/// Normalized block stream built from mdast.
pub mod blocks;
/// Category classification of a docs tree.
pub mod classify;
/// Single-document processing.
pub mod document;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Heading validation, slugs, and section trees.
pub mod headings;
/// Heading level shifting for raw markdown.
pub mod increment;
/// Markdown parsing through markdown-rs.
pub mod parse;
/// Package README fallback.
pub mod readme;
/// Slug generation utilities.
pub mod slug;
/// Split-view restructuring.
pub mod split_view;
/// Recursive file tree reading.
pub mod tree;

pub use blocks::{
    Anchor, Block, CodeBlock, GenericBlock, HeadingBlock, SplitView, blocks_from_mdast,
};
pub use classify::{Category, CategoryMatch, DocsCollection, SimpleContent, SimpleFile, classify};
pub use document::{
    ProcessedDocument, SessionGroup, SlugConfig, SourceDocument, process_document,
    title_from_file_name,
};
pub use error::{DocsmithError, SourceLocation};
pub use frontmatter::{Frontmatter, FrontmatterError, split_frontmatter};
pub use headings::{HeadingEntry, HeadingProcessor, process_headings, validate_headings};
pub use increment::increment_headings;
pub use parse::{ParseOptions, parse_mdast};
pub use slug::{SlugOptions, SlugSession, SlugStrategy, unicode_safe, url_safe};
pub use split_view::split_view;
pub use tree::{FileNode, NodeContent, read_tree};
