//! Heading validation, hierarchical slugs, and the section tree.

use markdown::mdast::Node;
use serde::Serialize;

use crate::blocks::{Anchor, Block, GenericBlock, HeadingBlock, extract_text_from_nodes};
use crate::{DocsmithError, SlugSession};

/// Shallowest heading allowed inside a document body.
pub const MIN_HEADING_DEPTH: u8 = 3;
/// Deepest heading allowed inside a document body.
pub const MAX_HEADING_DEPTH: u8 = 5;
/// Headings deeper than this are skipped by scroll tracking.
const SCROLL_TRACKED_DEPTH: u8 = 4;

/// One node of a document's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    /// Slug of the heading.
    pub slug: String,
    /// Visible heading text.
    pub title: String,
    /// Deeper headings nested under this one.
    pub sections: Vec<HeadingEntry>,
}

/// Checks every heading, including ones nested in lists or quotes.
///
/// Levels 1 and 2 belong to the page and site chrome; levels past 5 are not
/// rendered in the table of contents.
pub fn validate_headings(blocks: &[Block]) -> Result<(), DocsmithError> {
    for block in blocks {
        match block {
            Block::Heading(heading) => check_depth(heading.depth, || heading.text())?,
            Block::SplitView(split) => validate_headings(&split.copy)?,
            Block::Generic(block) => validate_nested(&block.node)?,
            Block::Paragraph(_) | Block::Code(_) | Block::Rule => {}
        }
    }
    Ok(())
}

fn validate_nested(node: &Node) -> Result<(), DocsmithError> {
    if let Node::Heading(heading) = node {
        check_depth(heading.depth, || extract_text_from_nodes(&heading.children))?;
    }
    for child in node.children().into_iter().flatten() {
        validate_nested(child)?;
    }
    Ok(())
}

fn check_depth(depth: u8, text: impl FnOnce() -> String) -> Result<(), DocsmithError> {
    if (MIN_HEADING_DEPTH..=MAX_HEADING_DEPTH).contains(&depth) {
        Ok(())
    } else {
        Err(DocsmithError::InvalidHeadingDepth {
            depth,
            text: text(),
        })
    }
}

/// Open heading levels of a document.
///
/// Each open level owns the entry that was last appended at that depth;
/// closing a level attaches its entry to the level above, or to the root.
#[derive(Debug, Default)]
struct SectionStack {
    root: Vec<HeadingEntry>,
    open: Vec<(u8, HeadingEntry)>,
}

impl SectionStack {
    /// Closes every level at `depth` or deeper, then opens `entry` at `depth`.
    fn append(&mut self, depth: u8, entry: HeadingEntry) {
        self.close_from(depth);
        self.open.push((depth, entry));
    }

    fn close_from(&mut self, depth: u8) {
        while self.open.last().is_some_and(|(open, _)| *open >= depth) {
            if let Some((_, closed)) = self.open.pop() {
                self.attach(closed);
            }
        }
    }

    fn attach(&mut self, entry: HeadingEntry) {
        match self.open.last_mut() {
            Some((_, parent)) => parent.sections.push(entry),
            None => self.root.push(entry),
        }
    }

    fn depth(&self) -> usize {
        self.open.len()
    }

    fn finish(mut self) -> Vec<HeadingEntry> {
        self.close_from(0);
        self.root
    }
}

/// Visits one document's headings in order, minting slugs and injecting
/// anchors.
///
/// A depth-3 heading seeds its slug with the document's section title; deeper
/// headings seed theirs with the most recent slug on the slug stack, so a
/// child's slug carries its ancestors' context.
pub struct HeadingProcessor<'s> {
    session: &'s SlugSession,
    section_title: String,
    link_base: String,
    prev_level: Option<u8>,
    slugs: Vec<String>,
    sections: SectionStack,
}

impl<'s> HeadingProcessor<'s> {
    /// Creates a processor for one document.
    ///
    /// `link_base` is the page the document is rendered into; anchors link to
    /// `link_base#slug`.
    pub fn new(
        session: &'s SlugSession,
        section_title: impl Into<String>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            session,
            section_title: section_title.into(),
            link_base: link_base.into(),
            prev_level: None,
            slugs: Vec::new(),
            sections: SectionStack::default(),
        }
    }

    /// Visits a heading, returning the slug assigned to it.
    pub fn visit(&mut self, heading: &mut HeadingBlock) -> Result<String, DocsmithError> {
        let (slug, anchors) = self.mint(heading.depth, heading.text())?;
        heading.anchors = anchors;
        Ok(slug)
    }

    /// Visits every heading nested in `block`, in document order.
    pub fn visit_nested(&mut self, block: &mut GenericBlock) -> Result<(), DocsmithError> {
        let nested: Vec<(u8, String)> = block
            .nested_headings()
            .into_iter()
            .map(|heading| (heading.depth, extract_text_from_nodes(&heading.children)))
            .collect();

        block.heading_anchors.clear();
        for (depth, title) in nested {
            let (_, anchors) = self.mint(depth, title)?;
            block.heading_anchors.push(anchors);
        }
        Ok(())
    }

    fn mint(&mut self, depth: u8, title: String) -> Result<(String, Vec<Anchor>), DocsmithError> {
        if let Some(prev) = self.prev_level
            && depth < prev
            && !self.slugs.is_empty()
        {
            let pops = usize::from(prev - depth + 1).min(self.slugs.len());
            self.slugs.truncate(self.slugs.len() - pops);
        }

        let seed = if depth == MIN_HEADING_DEPTH {
            format!("{} {}", self.section_title, title)
        } else {
            let parent = self.slugs.last().unwrap_or(&self.section_title);
            format!("{} {}", parent, title)
        };

        let slug = self.session.slug(&seed)?;
        self.slugs.push(slug.clone());

        self.sections.append(
            depth,
            HeadingEntry {
                slug: slug.clone(),
                title,
                sections: Vec::new(),
            },
        );
        self.prev_level = Some(depth);

        let anchors = vec![
            Anchor::Offset {
                id: slug.clone(),
                scroll_ignore: depth > SCROLL_TRACKED_DEPTH,
            },
            Anchor::LinkBack {
                href: format!("{}#{}", self.link_base, slug),
            },
        ];
        Ok((slug, anchors))
    }

    /// Number of currently open heading levels.
    pub fn open_levels(&self) -> usize {
        self.sections.depth()
    }

    /// Returns the finished section tree.
    pub fn finish(self) -> Vec<HeadingEntry> {
        self.sections.finish()
    }
}

/// Validates, then processes every heading of a document, including ones
/// nested in quotes or list items, in document order.
///
/// Nothing is mutated when validation fails.
pub fn process_headings(
    blocks: &mut [Block],
    session: &SlugSession,
    section_title: &str,
    link_base: &str,
) -> Result<Vec<HeadingEntry>, DocsmithError> {
    validate_headings(blocks)?;

    let mut processor = HeadingProcessor::new(session, section_title, link_base);
    for block in blocks.iter_mut() {
        match block {
            Block::Heading(heading) => {
                processor.visit(heading)?;
            }
            Block::Generic(generic) => processor.visit_nested(generic)?,
            _ => {}
        }
    }
    Ok(processor.finish())
}
