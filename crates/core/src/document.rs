//! Processing one markdown document end to end.

use serde::{Deserialize, Serialize};

use crate::blocks::{Block, blocks_from_mdast};
use crate::frontmatter::split_frontmatter;
use crate::headings::{HeadingEntry, process_headings, validate_headings};
use crate::parse::{ParseOptions, parse_mdast};
use crate::slug::{SlugOptions, SlugSession};
use crate::split_view::split_view;
use crate::DocsmithError;

/// Slug settings for a processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugConfig {
    /// Keep runs of non-Latin letters untouched in slugs.
    #[serde(default)]
    pub preserve_unicode: bool,
    /// Separator for heading slugs.
    #[serde(default = "default_heading_separator")]
    pub heading_separator: String,
    /// Separator for document title slugs.
    #[serde(default = "default_title_separator")]
    pub title_separator: String,
}

fn default_heading_separator() -> String {
    SlugOptions::heading().separator
}

fn default_title_separator() -> String {
    SlugOptions::title().separator
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            preserve_unicode: false,
            heading_separator: default_heading_separator(),
            title_separator: default_title_separator(),
        }
    }
}

/// The slug sessions shared by every document rendered into one page.
///
/// Build one per concatenation group and pass it to each
/// [`process_document`] call of that group.
#[derive(Debug)]
pub struct SessionGroup {
    /// Document title slugs.
    pub titles: SlugSession,
    /// Heading slugs.
    pub headings: SlugSession,
}

impl SessionGroup {
    /// Creates fresh sessions from `config`.
    pub fn new(config: &SlugConfig) -> Self {
        Self {
            titles: SlugSession::new(SlugOptions {
                preserve_unicode: config.preserve_unicode,
                separator: config.title_separator.clone(),
            }),
            headings: SlugSession::new(SlugOptions {
                preserve_unicode: config.preserve_unicode,
                separator: config.heading_separator.clone(),
            }),
        }
    }
}

impl Default for SessionGroup {
    fn default() -> Self {
        Self::new(&SlugConfig::default())
    }
}

/// A document waiting to be processed.
#[derive(Debug, Clone, Copy)]
pub struct SourceDocument<'a> {
    /// Path relative to the docs root (`docs/01-intro.md`).
    pub file: &'a str,
    /// Raw markdown, frontmatter included.
    pub content: &'a str,
    /// Page the document is rendered into; heading links point at it.
    pub page: &'a str,
}

/// A fully processed document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    /// Source path relative to the docs root.
    pub file: String,
    /// Slug of the document title.
    pub slug: String,
    /// Document (section) title.
    pub title: String,
    /// Table of contents.
    pub sections: Vec<HeadingEntry>,
    /// Normalized block stream.
    pub blocks: Vec<Block>,
}

/// Parses, validates, slugs, and restructures one document.
///
/// Any failure is wrapped with the document path; state already recorded in
/// `sessions` by earlier documents is left as is.
pub fn process_document(
    source: SourceDocument<'_>,
    sessions: &SessionGroup,
) -> Result<ProcessedDocument, DocsmithError> {
    process(source, sessions).map_err(|err| err.in_document(source.file))
}

fn process(
    source: SourceDocument<'_>,
    sessions: &SessionGroup,
) -> Result<ProcessedDocument, DocsmithError> {
    let frontmatter = split_frontmatter(source.content)?;
    let title = frontmatter
        .title()
        .map(str::to_string)
        .unwrap_or_else(|| title_from_file_name(source.file));

    let root = parse_mdast(frontmatter.body, &ParseOptions::docs())?;
    let mut blocks = blocks_from_mdast(root);
    validate_headings(&blocks)?;

    // The title is only reserved once the headings went through.
    let candidate = sessions.titles.preview(&title);
    if sessions.titles.contains(&candidate) {
        return Err(DocsmithError::DuplicateSlug { slug: candidate });
    }
    let sections = process_headings(&mut blocks, &sessions.headings, &title, source.page)?;
    let slug = sessions.titles.slug(&title)?;
    let blocks = split_view(blocks);

    Ok(ProcessedDocument {
        file: source.file.to_string(),
        slug,
        title,
        sections,
        blocks,
    })
}

/// Derives a title from a file path such as `docs/01-getting_started.md`.
///
/// The extension and a numeric ordering prefix are dropped, dashes and
/// underscores read as spaces, and the first letter is upper-cased.
pub fn title_from_file_name(file: &str) -> String {
    let name = file.rsplit('/').next().unwrap_or(file);
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let unprefixed = match stem.split_once('-') {
        Some((prefix, rest))
            if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => stem,
    };

    let words = unprefixed
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => stem.to_string(),
    }
}
