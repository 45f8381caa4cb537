//! In-memory snapshot of a documentation directory.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::DocsmithError;

/// Finder metadata files never make it into the tree.
const IGNORED_ENTRIES: &[&str] = &[".DS_Store"];

/// A file or directory read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Entry name (last path component).
    pub name: String,
    /// File text or directory children.
    pub content: NodeContent,
}

/// Content of a [`FileNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Raw file text.
    File(String),
    /// Children in listing order.
    Dir(Vec<FileNode>),
}

impl FileNode {
    /// Creates a file node.
    pub fn file(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: NodeContent::File(text.into()),
        }
    }

    /// Creates a directory node.
    pub fn dir(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            content: NodeContent::Dir(children),
        }
    }

    /// Returns true for directories.
    pub fn is_dir(&self) -> bool {
        matches!(self.content, NodeContent::Dir(_))
    }

    /// Directory children, or `None` for files.
    pub fn children(&self) -> Option<&[FileNode]> {
        match &self.content {
            NodeContent::Dir(children) => Some(children),
            NodeContent::File(_) => None,
        }
    }

    /// File text, or `None` for directories.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            NodeContent::File(text) => Some(text),
            NodeContent::Dir(_) => None,
        }
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FileNode> {
        self.children()?.iter().find(|child| child.name == name)
    }

    /// Resolves a relative `a/b/c` path one component at a time.
    pub fn descend(&self, relative: &str) -> Option<&FileNode> {
        relative
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .try_fold(self, |node, part| node.child(part))
    }
}

/// Reads `path` into a [`FileNode`] tree.
///
/// Each path is stat'ed first: regular files are read as text (bytes that
/// are not UTF-8 are replaced, so images and other assets never fail),
/// directories are listed (sorted by name, metadata files skipped) and their
/// entries read in parallel. Any IO failure aborts the whole read.
pub fn read_tree(path: impl AsRef<Path>) -> Result<FileNode, DocsmithError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|err| DocsmithError::unreadable(path, err))?;
    let name = node_name(path);

    if !metadata.is_dir() {
        let bytes = fs::read(path).map_err(|err| DocsmithError::unreadable(path, err))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                log::debug!("{} is not UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        return Ok(FileNode::file(name, text));
    }

    let entries = list_dir(path)?;
    let children = entries
        .par_iter()
        .map(|entry| read_tree(entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FileNode::dir(name, children))
}

fn list_dir(path: &Path) -> Result<Vec<PathBuf>, DocsmithError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(|err| DocsmithError::unreadable(path, err))? {
        let entry = entry.map_err(|err| DocsmithError::unreadable(path, err))?;
        let file_name = entry.file_name();
        if IGNORED_ENTRIES
            .iter()
            .any(|ignored| file_name.to_string_lossy() == *ignored)
        {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileNode {
        FileNode::dir(
            "documentation",
            vec![
                FileNode::dir("docs", vec![FileNode::file("01-intro.md", "### Hi")]),
                FileNode::file("README.md", "# Readme"),
            ],
        )
    }

    #[test]
    fn child_lookup() {
        let tree = sample();
        assert!(tree.child("docs").is_some_and(FileNode::is_dir));
        assert_eq!(tree.child("README.md").and_then(FileNode::text), Some("# Readme"));
        assert!(tree.child("missing").is_none());
    }

    #[test]
    fn descend_nested_path() {
        let tree = FileNode::dir("root", vec![sample()]);
        let intro = tree.descend("documentation/docs/01-intro.md");
        assert_eq!(intro.and_then(FileNode::text), Some("### Hi"));
        assert_eq!(tree.descend("./documentation/").map(|n| n.name.as_str()), Some("documentation"));
        assert!(tree.descend("documentation/README.md/x").is_none());
    }
}
