use std::path::PathBuf;
use thiserror::Error;

use crate::frontmatter::FrontmatterError;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while reading and transforming documentation.
#[derive(Debug, Error)]
pub enum DocsmithError {
    /// A heading outside the allowed 3..=5 depth range.
    #[error(
        "Only level 3, 4, and 5 headings are allowed. Got level {depth} heading \"{text}\"."
    )]
    InvalidHeadingDepth {
        /// Offending heading depth.
        depth: u8,
        /// Plain text of the offending heading.
        text: String,
    },
    /// A slug that was already emitted in the same session.
    #[error("Duplicate slug {slug}")]
    DuplicateSlug {
        /// The colliding slug.
        slug: String,
    },
    /// A file or directory that could not be read.
    #[error("Unable to read {}: {source}", path.display())]
    UnreadableNode {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Frontmatter could not be extracted.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// A package manifest that is missing fields or is not valid JSON.
    #[error("Invalid package manifest {}: {message}", path.display())]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Error message
        message: String,
    },
    /// Processing of a single document failed.
    #[error("{document}: {source}")]
    DocumentFailed {
        /// Relative path of the document.
        document: String,
        /// The failure inside the document.
        #[source]
        source: Box<DocsmithError>,
    },
}

impl DocsmithError {
    /// Create an unreadable-node error for `path`.
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnreadableNode {
            path: path.into(),
            source,
        }
    }

    /// Attach the document name to an error raised while processing it.
    pub fn in_document(self, document: impl Into<String>) -> Self {
        match self {
            already @ Self::DocumentFailed { .. } => already,
            other => Self::DocumentFailed {
                document: document.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, skipping document wrappers.
    pub fn root_cause(&self) -> &DocsmithError {
        match self {
            Self::DocumentFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_slug_message_names_slug() {
        let err = DocsmithError::DuplicateSlug {
            slug: "Template_syntax".into(),
        };
        assert_eq!(err.to_string(), "Duplicate slug Template_syntax");
    }

    #[test]
    fn document_wrapper_is_not_nested_twice() {
        let err = DocsmithError::DuplicateSlug { slug: "a".into() }
            .in_document("docs/01-intro.md")
            .in_document("docs/other.md");
        assert_eq!(err.to_string(), "docs/01-intro.md: Duplicate slug a");
        assert!(matches!(
            err.root_cause(),
            DocsmithError::DuplicateSlug { slug } if slug == "a"
        ));
    }

    #[test]
    fn heading_depth_message_includes_text() {
        let err = DocsmithError::InvalidHeadingDepth {
            depth: 2,
            text: "Setup".into(),
        };
        assert_eq!(
            err.to_string(),
            "Only level 3, 4, and 5 headings are allowed. Got level 2 heading \"Setup\"."
        );
    }
}
