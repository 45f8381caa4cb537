//! Markdown parsing through markdown-rs.

use crate::{DocsmithError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// How markdown-rs reads documentation sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// GFM tables, strikethrough, task lists, footnotes, and autolinks.
    pub gfm: bool,
    /// Keep inline and block HTML as `Html` nodes.
    pub raw_html: bool,
    /// Treat four-space indented lines as code.
    pub code_indented: bool,
}

impl ParseOptions {
    /// Defaults for documentation sources: GFM and raw HTML on, indented
    /// code off so every code block is fenced.
    pub const fn docs() -> Self {
        Self {
            gfm: true,
            raw_html: true,
            code_indented: false,
        }
    }

    /// Builds the markdown-rs options.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let base = if self.gfm {
            markdown::Constructs::gfm()
        } else {
            markdown::Constructs::default()
        };
        markdown::ParseOptions {
            constructs: markdown::Constructs {
                code_indented: self.code_indented,
                html_flow: self.raw_html,
                html_text: self.raw_html,
                ..base
            },
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::docs()
    }
}

/// Parses markdown into an mdast tree.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, DocsmithError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        DocsmithError::MarkdownAdapter {
            location: location_of(&err),
            message: err.to_string(),
        }
    })
}

fn location_of(message: &Message) -> SourceLocation {
    let point = match message.place.as_deref() {
        Some(Place::Point(point)) => point,
        Some(Place::Position(position)) => &position.start,
        None => return SourceLocation::new(1, 1),
    };
    SourceLocation::new(point.line, point.column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root() {
        let root = parse_mdast("### Title\n\ntext", &ParseOptions::docs()).unwrap();
        assert!(matches!(root, Node::Root(ref r) if r.children.len() == 2));
    }

    #[test]
    fn indented_code_is_a_paragraph() {
        let root = parse_mdast("para\n\n    not code", &ParseOptions::docs()).unwrap();
        let Node::Root(root) = root else {
            panic!("expected root");
        };
        assert!(root.children.iter().all(|node| !matches!(node, Node::Code(_))));
    }
}
