//! Flat block stream of a parsed document.
//!
//! A document is reduced to its top-level blocks. Headings carry a typed slot
//! for the anchor markers injected by the heading processor; split views are
//! produced later by regrouping the stream.

use markdown::mdast::{self, Node};

/// One top-level block of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// ATX or setext heading.
    Heading(HeadingBlock),
    /// Paragraph with inline children.
    Paragraph(Vec<Node>),
    /// Fenced code block.
    Code(CodeBlock),
    /// Horizontal rule (`---`, `***`, `___`).
    Rule,
    /// Prose paired with a code sample.
    SplitView(SplitView),
    /// Any other block (lists, tables, quotes, raw HTML, ...).
    Generic(GenericBlock),
}

/// A block kept as its mdast node.
///
/// Headings nested inside (in a quote or a list item) stay mdast nodes; their
/// anchor markers live in `heading_anchors`, one entry per heading in
/// depth-first document order.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericBlock {
    /// The block as parsed.
    pub node: Node,
    /// Anchor markers of the nested headings.
    pub heading_anchors: Vec<Vec<Anchor>>,
}

impl GenericBlock {
    /// Wraps a node with no anchors yet.
    pub fn new(node: Node) -> Self {
        Self {
            node,
            heading_anchors: Vec::new(),
        }
    }

    /// Nested headings in depth-first document order.
    pub fn nested_headings(&self) -> Vec<&mdast::Heading> {
        let mut found = Vec::new();
        collect_headings(&self.node, &mut found);
        found
    }
}

fn collect_headings<'a>(node: &'a Node, found: &mut Vec<&'a mdast::Heading>) {
    if let Node::Heading(heading) = node {
        found.push(heading);
    }
    for child in node.children().into_iter().flatten() {
        collect_headings(child, found);
    }
}

/// Heading with its injected anchor markers.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingBlock {
    /// Heading depth (1-6).
    pub depth: u8,
    /// Inline children as parsed.
    pub children: Vec<Node>,
    /// Markers rendered before the children, in order.
    pub anchors: Vec<Anchor>,
}

impl HeadingBlock {
    /// Plain text of the heading.
    pub fn text(&self) -> String {
        extract_text_from_nodes(&self.children)
    }
}

/// Presentational marker injected into a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Invisible scroll target carrying the slug as its id.
    Offset {
        /// Element id.
        id: String,
        /// Excluded from scroll tracking.
        scroll_ignore: bool,
    },
    /// Link back to the heading itself.
    LinkBack {
        /// Link target (`page#slug`).
        href: String,
    },
}

/// Fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// The code content.
    pub value: String,
    /// Optional language identifier.
    pub lang: Option<String>,
    /// Optional meta string.
    pub meta: Option<String>,
}

/// Prose blocks next to one code sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitView {
    /// Prose side, in source order.
    pub copy: Vec<Block>,
    /// Code side.
    pub code: CodeBlock,
}

/// Converts a parsed MDAST root into the flat block stream.
///
/// Frontmatter nodes are dropped; non-root input becomes a single generic
/// block.
pub fn blocks_from_mdast(root: Node) -> Vec<Block> {
    let children = match root {
        Node::Root(root) => root.children,
        other => return vec![Block::Generic(GenericBlock::new(other))],
    };

    children
        .into_iter()
        .filter_map(|node| match node {
            Node::Heading(heading) => Some(Block::Heading(HeadingBlock {
                depth: heading.depth,
                children: heading.children,
                anchors: Vec::new(),
            })),
            Node::Paragraph(paragraph) => Some(Block::Paragraph(paragraph.children)),
            Node::Code(code) => Some(Block::Code(CodeBlock {
                value: code.value,
                lang: code.lang,
                meta: code.meta,
            })),
            Node::ThematicBreak(_) => Some(Block::Rule),
            Node::Yaml(_) | Node::Toml(_) => None,
            other => Some(Block::Generic(GenericBlock::new(other))),
        })
        .collect()
}

/// Extracts plain text from a list of AST nodes (for heading text).
pub fn extract_text_from_nodes(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        extract_text_from_node(node, &mut text);
    }
    text.trim().to_string()
}

fn extract_text_from_node(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(t) => buffer.push_str(&t.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::Html(html) => buffer.push_str(&html.value),
        Node::Image(image) => buffer.push_str(&image.alt),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    extract_text_from_node(child, buffer);
                }
            }
        }
    }
}
