//! Output buffer and scope tracking for the renderer.

use std::collections::VecDeque;

use docsmith_core::Anchor;

/// Where the renderer currently is inside nested block structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Document root.
    Root,
    /// Inside `<p>`.
    Paragraph,
    /// Inside `<ul>` or `<ol>`.
    List {
        /// Loose lists keep `<p>` around item content.
        spread: bool,
    },
    /// Inside `<table>`, `<tr>`, or a cell.
    Table,
    /// Inside `<blockquote>`.
    Quote,
}

/// HTML buffer with escaping helpers and a scope stack.
#[derive(Debug)]
pub struct HtmlWriter {
    out: String,
    stack: Vec<Scope>,
    heading_anchors: VecDeque<Vec<Anchor>>,
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlWriter {
    /// Creates an empty writer at the root scope.
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
            stack: vec![Scope::Root],
            heading_anchors: VecDeque::new(),
        }
    }

    /// Writes markup verbatim.
    pub fn push_raw(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Writes text content, escaping `&`, `<`, and `>`.
    pub fn push_text(&mut self, s: &str) {
        html_escape::encode_text_to_string(s, &mut self.out);
    }

    /// Writes a value for a double-quoted attribute.
    pub fn push_attr_value(&mut self, s: &str) {
        html_escape::encode_double_quoted_attribute_to_string(s, &mut self.out);
    }

    /// Writes `name="value"` preceded by a space.
    pub fn push_attr(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.push_attr_value(value);
        self.out.push('"');
    }

    /// Writes a value for a single-quoted attribute.
    pub fn push_single_quoted_attr_value(&mut self, s: &str) {
        html_escape::encode_single_quoted_attribute_to_string(s, &mut self.out);
    }

    /// Returns the innermost scope.
    pub fn current_scope(&self) -> Scope {
        self.stack.last().copied().unwrap_or(Scope::Root)
    }

    /// True inside a tight list, where paragraphs lose their `<p>`.
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|scope| matches!(scope, Scope::List { .. }))
            .is_some_and(|scope| matches!(scope, Scope::List { spread: false }))
    }

    /// Pushes a scope.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Pops the innermost scope; the root is never popped.
    pub fn exit(&mut self) -> Option<Scope> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Replaces the anchors handed out to nested headings, in order.
    pub fn set_heading_anchors(&mut self, anchors: &[Vec<Anchor>]) {
        self.heading_anchors = anchors.iter().cloned().collect();
    }

    /// Anchors for the next nested heading; empty once the queue runs out.
    pub fn next_heading_anchors(&mut self) -> Vec<Anchor> {
        self.heading_anchors.pop_front().unwrap_or_default()
    }

    /// Length of the output so far.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// True when nothing was written.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Consumes the writer and returns the HTML.
    pub fn finish(self) -> String {
        self.out
    }
}
