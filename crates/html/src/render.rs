//! Rendering functions for the block stream.

use docsmith_core::{Anchor, Block, CodeBlock, GenericBlock, HeadingBlock, SplitView};
use markdown::mdast::{self, AlignKind, Node};

use crate::context::{HtmlWriter, Scope};

/// Renders a block stream, one block per line.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut writer = HtmlWriter::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            writer.push_raw("\n");
        }
        render_block(block, &mut writer);
    }
    writer.finish()
}

/// Renders one block.
pub fn render_block(block: &Block, writer: &mut HtmlWriter) {
    match block {
        Block::Heading(heading) => render_heading(heading, writer),
        Block::Paragraph(children) => {
            writer.push_raw("<p>");
            writer.enter(Scope::Paragraph);
            render_children(children, writer);
            writer.exit();
            writer.push_raw("</p>");
        }
        Block::Code(code) => render_code(code, writer),
        Block::Rule => writer.push_raw("<hr />"),
        Block::SplitView(split) => render_split_view(split, writer),
        Block::Generic(generic) => render_generic(generic, writer),
    }
}

/// Renders a heading with its anchor markers ahead of the content.
fn render_heading(heading: &HeadingBlock, writer: &mut HtmlWriter) {
    let tag = format!("h{}", heading.depth);
    writer.push_raw(&format!("<{}>", tag));

    render_anchors(&heading.anchors, writer);
    render_children(&heading.children, writer);
    writer.push_raw(&format!("</{}>", tag));
}

fn render_anchors(anchors: &[Anchor], writer: &mut HtmlWriter) {
    for anchor in anchors {
        match anchor {
            Anchor::Offset { id, scroll_ignore } => {
                writer.push_raw("<span");
                writer.push_attr("id", id);
                writer.push_attr("class", "offset-anchor");
                if *scroll_ignore {
                    writer.push_raw(" data-scrollignore");
                }
                writer.push_raw("></span>");
            }
            Anchor::LinkBack { href } => {
                writer.push_raw("<a");
                writer.push_attr("href", href);
                writer.push_attr("class", "anchor");
                writer.push_attr("aria-hidden", "true");
                writer.push_raw("></a>");
            }
        }
    }
}

fn render_generic(generic: &GenericBlock, writer: &mut HtmlWriter) {
    writer.set_heading_anchors(&generic.heading_anchors);
    render_node(&generic.node, writer);
    writer.set_heading_anchors(&[]);
}

fn render_nested_heading(heading: &mdast::Heading, writer: &mut HtmlWriter) {
    let tag = format!("h{}", heading.depth);
    writer.push_raw(&format!("<{}>", tag));
    let anchors = writer.next_heading_anchors();
    render_anchors(&anchors, writer);
    render_children(&heading.children, writer);
    writer.push_raw(&format!("</{}>", tag));
}

/// Renders the side-by-side wrapper: prose on the left, code on the right.
fn render_split_view(split: &SplitView, writer: &mut HtmlWriter) {
    writer.push_raw("<div class=\"side-by-side\"><div class=\"copy\">\n");
    for block in &split.copy {
        render_block(block, writer);
        writer.push_raw("\n");
    }
    writer.push_raw("</div><div class=\"code\">");
    render_code(&split.code, writer);
    writer.push_raw("</div></div>");
}

/// Maps short fence languages to the class names the site styles.
pub fn language_class(lang: &str) -> &str {
    match lang {
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "sh" | "shell" | "zsh" => "bash",
        "html" | "xml" | "svg" => "markup",
        "md" => "markdown",
        "yml" => "yaml",
        other => other,
    }
}

/// Renders a code block as `<pre class='language-x'><code>`.
pub fn render_code(code: &CodeBlock, writer: &mut HtmlWriter) {
    match code.lang.as_deref().filter(|lang| !lang.is_empty()) {
        Some(lang) => {
            writer.push_raw("<pre class='language-");
            writer.push_single_quoted_attr_value(language_class(lang));
            writer.push_raw("'>");
        }
        None => writer.push_raw("<pre>"),
    }
    writer.push_raw("<code>");
    writer.push_text(&code.value);
    writer.push_raw("</code></pre>");
}

fn render_children(children: &[Node], writer: &mut HtmlWriter) {
    for child in children {
        render_node(child, writer);
    }
}

fn render_paragraph(paragraph: &mdast::Paragraph, writer: &mut HtmlWriter) {
    let in_tight_list = writer.is_in_tight_list();
    if !in_tight_list {
        writer.push_raw("<p>");
        writer.enter(Scope::Paragraph);
    }
    render_children(&paragraph.children, writer);
    if !in_tight_list {
        writer.exit();
        writer.push_raw("</p>");
    }
}

fn render_list(list: &mdast::List, writer: &mut HtmlWriter) {
    let tag = if list.ordered { "ol" } else { "ul" };
    writer.push_raw("<");
    writer.push_raw(tag);
    if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
        writer.push_attr("start", &start.to_string());
    }
    writer.push_raw(">");

    writer.enter(Scope::List {
        spread: list.spread,
    });
    render_children(&list.children, writer);
    writer.exit();

    writer.push_raw(&format!("</{}>", tag));
}

fn render_list_item(item: &mdast::ListItem, writer: &mut HtmlWriter) {
    writer.push_raw("<li>");
    if let Some(checked) = item.checked {
        writer.push_raw("<input type=\"checkbox\" disabled");
        if checked {
            writer.push_raw(" checked");
        }
        writer.push_raw(" /> ");
    }
    render_children(&item.children, writer);
    writer.push_raw("</li>");
}

fn render_table(table: &mdast::Table, writer: &mut HtmlWriter) {
    writer.enter(Scope::Table);
    writer.push_raw("<table><thead>");
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, "th", &table.align, writer);
    }
    writer.push_raw("</thead>");

    if table.children.len() > 1 {
        writer.push_raw("<tbody>");
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(row) = row {
                render_table_row(row, "td", &table.align, writer);
            }
        }
        writer.push_raw("</tbody>");
    }

    writer.push_raw("</table>");
    writer.exit();
}

fn render_table_row(row: &mdast::TableRow, tag: &str, aligns: &[AlignKind], writer: &mut HtmlWriter) {
    writer.push_raw("<tr>");
    for (i, cell) in row.children.iter().enumerate() {
        let Node::TableCell(cell) = cell else {
            continue;
        };
        let align = match aligns.get(i) {
            Some(AlignKind::Left) => " align=\"left\"",
            Some(AlignKind::Right) => " align=\"right\"",
            Some(AlignKind::Center) => " align=\"center\"",
            Some(AlignKind::None) | None => "",
        };
        writer.push_raw(&format!("<{}{}>", tag, align));
        render_children(&cell.children, writer);
        writer.push_raw(&format!("</{}>", tag));
    }
    writer.push_raw("</tr>");
}

fn render_link(link: &mdast::Link, writer: &mut HtmlWriter) {
    writer.push_raw("<a");
    writer.push_attr("href", &link.url);
    if let Some(title) = &link.title {
        writer.push_attr("title", title);
    }
    writer.push_raw(">");
    render_children(&link.children, writer);
    writer.push_raw("</a>");
}

fn render_image(image: &mdast::Image, writer: &mut HtmlWriter) {
    writer.push_raw("<img");
    writer.push_attr("src", &image.url);
    writer.push_attr("alt", &image.alt);
    if let Some(title) = &image.title {
        writer.push_attr("title", title);
    }
    writer.push_raw(" />");
}

fn wrap(tag: &str, children: &[Node], writer: &mut HtmlWriter) {
    writer.push_raw(&format!("<{}>", tag));
    render_children(children, writer);
    writer.push_raw(&format!("</{}>", tag));
}

/// Renders an mdast node nested inside a generic block or a paragraph.
pub fn render_node(node: &Node, writer: &mut HtmlWriter) {
    match node {
        Node::Root(root) => render_children(&root.children, writer),
        Node::Text(text) => writer.push_text(&text.value),
        Node::Paragraph(paragraph) => render_paragraph(paragraph, writer),
        Node::Strong(strong) => wrap("strong", &strong.children, writer),
        Node::Emphasis(emphasis) => wrap("em", &emphasis.children, writer),
        Node::Delete(delete) => wrap("del", &delete.children, writer),
        Node::InlineCode(code) => {
            writer.push_raw("<code>");
            writer.push_text(&code.value);
            writer.push_raw("</code>");
        }
        Node::Break(_) => writer.push_raw("<br />"),
        Node::Link(link) => render_link(link, writer),
        Node::LinkReference(reference) => render_children(&reference.children, writer),
        Node::Image(image) => render_image(image, writer),
        Node::Html(html) => writer.push_raw(&html.value),
        Node::Heading(heading) => render_nested_heading(heading, writer),
        Node::List(list) => render_list(list, writer),
        Node::ListItem(item) => render_list_item(item, writer),
        Node::Blockquote(quote) => {
            writer.push_raw("<blockquote>");
            writer.enter(Scope::Quote);
            render_children(&quote.children, writer);
            writer.exit();
            writer.push_raw("</blockquote>");
        }
        Node::Code(code) => render_code(
            &CodeBlock {
                value: code.value.clone(),
                lang: code.lang.clone(),
                meta: code.meta.clone(),
            },
            writer,
        ),
        Node::ThematicBreak(_) => writer.push_raw("<hr />"),
        Node::Table(table) => render_table(table, writer),
        Node::TableRow(_) | Node::TableCell(_) => {}
        Node::Definition(_) | Node::Yaml(_) | Node::Toml(_) => {}
        _ => {
            log::warn!("Unhandled markdown node type: {:?}", node);
        }
    }
}
