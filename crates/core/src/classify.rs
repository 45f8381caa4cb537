//! Sorting a project's documentation tree into known categories.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::tree::{FileNode, NodeContent};

/// Documentation categories recognized under the docs root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Reference documentation.
    Docs,
    /// Frequently asked questions.
    Faq,
    /// Migration notes.
    Migrating,
    /// Blog posts.
    Blog,
    /// Tutorials (not yet supported).
    Tutorials,
    /// Examples (not yet supported).
    Examples,
}

impl Category {
    /// All categories in key order.
    pub const ALL: [Category; 6] = [
        Category::Docs,
        Category::Faq,
        Category::Migrating,
        Category::Blog,
        Category::Tutorials,
        Category::Examples,
    ];

    /// Directory name / collection key.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Docs => "docs",
            Category::Faq => "faq",
            Category::Migrating => "migrating",
            Category::Blog => "blog",
            Category::Tutorials => "tutorials",
            Category::Examples => "examples",
        }
    }

    /// Whether documents in this category can be transformed.
    pub fn is_supported(self) -> bool {
        !matches!(self, Category::Tutorials | Category::Examples)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of matching a directory name against the known categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    /// The name is a known category.
    Recognized(Category),
    /// Anything else; skipped without error.
    Ignored,
}

impl CategoryMatch {
    /// Matches a directory name.
    pub fn from_name(name: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .map_or(CategoryMatch::Ignored, CategoryMatch::Recognized)
    }
}

/// A file entry with the directory flag stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleFile {
    /// Entry name.
    pub name: String,
    /// Text or nested entries.
    pub content: SimpleContent,
}

/// Content of a [`SimpleFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SimpleContent {
    /// File text.
    Text(String),
    /// Nested entries.
    Entries(Vec<SimpleFile>),
}

impl SimpleFile {
    /// Recursively strips a [`FileNode`].
    pub fn from_node(node: &FileNode) -> Self {
        let content = match &node.content {
            NodeContent::File(text) => SimpleContent::Text(text.clone()),
            NodeContent::Dir(children) => {
                SimpleContent::Entries(children.iter().map(SimpleFile::from_node).collect())
            }
        };
        Self {
            name: node.name.clone(),
            content,
        }
    }

    /// Visits every text file depth-first, yielding `(relative_path, text)`.
    pub fn walk_files<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        let path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", prefix, self.name)
        };
        match &self.content {
            SimpleContent::Text(text) => out.push((path, text)),
            SimpleContent::Entries(entries) => {
                for entry in entries {
                    entry.walk_files(&path, out);
                }
            }
        }
    }
}

/// Categorized documentation for one project.
///
/// Only categories that exist on disk are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocsCollection {
    categories: BTreeMap<Category, Vec<SimpleFile>>,
}

impl DocsCollection {
    /// Entries stored under `category`.
    pub fn get(&self, category: Category) -> Option<&[SimpleFile]> {
        self.categories.get(&category).map(Vec::as_slice)
    }

    /// Stores the entries of a category.
    pub fn insert(&mut self, category: Category, entries: Vec<SimpleFile>) {
        self.categories.insert(category, entries);
    }

    /// Iterates categories in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[SimpleFile])> {
        self.categories
            .iter()
            .map(|(category, entries)| (*category, entries.as_slice()))
    }

    /// Returns true when no category was found.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of categories present.
    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

/// Extracts the known documentation categories from a project tree.
///
/// `docs_path` names the documentation root (it may contain `/`); every
/// directory under it whose name is a [`Category`] is stored in the
/// collection. `pkg_path` is recognized but package docs are not gathered
/// here.
pub fn classify(
    tree: &FileNode,
    docs_path: &str,
    pkg_path: &str,
    project: &str,
) -> (String, DocsCollection) {
    let mut collection = DocsCollection::default();

    let (docs_head, docs_rest) = split_first_component(docs_path);
    let (pkg_head, _) = split_first_component(pkg_path);

    for child in tree.children().unwrap_or_default() {
        if child.name == docs_head {
            let docs_root = if docs_rest.is_empty() {
                Some(child)
            } else {
                child.descend(docs_rest)
            };
            if let Some(docs_root) = docs_root {
                collect_categories(docs_root, &mut collection);
            }
        }
        if child.name == pkg_head {
            log::debug!("{project}: package documentation under '{pkg_path}' is not aggregated");
        }
    }

    (project.to_string(), collection)
}

fn collect_categories(docs_root: &FileNode, collection: &mut DocsCollection) {
    for entry in docs_root.children().unwrap_or_default() {
        let NodeContent::Dir(children) = &entry.content else {
            continue;
        };
        match CategoryMatch::from_name(&entry.name) {
            CategoryMatch::Recognized(category) => {
                collection.insert(category, children.iter().map(SimpleFile::from_node).collect());
            }
            CategoryMatch::Ignored => {
                log::debug!("ignoring unrecognized documentation directory '{}'", entry.name);
            }
        }
    }
}

fn split_first_component(path: &str) -> (&str, &str) {
    let trimmed = path.trim_start_matches("./").trim_matches('/');
    trimmed.split_once('/').unwrap_or((trimmed, ""))
}
