//! Key/value storage entries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use docsmith_core::{Category, HeadingEntry, ProcessedDocument};

use crate::PipelineError;

/// One record for a key/value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvEntry {
    /// `project@category@slug`
    pub key: String,
    /// JSON of the stored document.
    pub value: String,
}

/// The stored form of a processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDocument<'a> {
    /// Document slug.
    pub slug: &'a str,
    /// Document title.
    pub title: &'a str,
    /// Source path relative to the docs root.
    pub file: &'a str,
    /// Table of contents.
    pub sections: &'a [HeadingEntry],
    /// Rendered body.
    pub content: &'a str,
}

/// Builds the storage key for a document.
pub fn entry_key(project: &str, category: Category, slug: &str) -> String {
    format!("{}@{}@{}", project, category, slug)
}

impl KvEntry {
    /// Serializes a processed document and its rendered body.
    pub fn from_document(
        project: &str,
        category: Category,
        document: &ProcessedDocument,
        content: &str,
    ) -> Result<Self, PipelineError> {
        let key = entry_key(project, category, &document.slug);
        let stored = StoredDocument {
            slug: &document.slug,
            title: &document.title,
            file: &document.file,
            sections: &document.sections,
            content,
        };
        let value = serde_json::to_string(&stored).map_err(|source| PipelineError::Serialize {
            key: key.clone(),
            source,
        })?;
        Ok(Self { key, value })
    }
}

/// Checks a batch of entries before it is written out.
///
/// Keys and values must be non-empty and keys unique across the batch.
pub fn check_entries<'a>(entries: impl IntoIterator<Item = &'a KvEntry>) -> Result<(), PipelineError> {
    let mut keys = HashSet::new();
    for entry in entries {
        if entry.key.is_empty() {
            return Err(PipelineError::InvalidEntry {
                key: entry.key.clone(),
                reason: "empty key",
            });
        }
        if entry.value.is_empty() {
            return Err(PipelineError::InvalidEntry {
                key: entry.key.clone(),
                reason: "empty value",
            });
        }
        if !keys.insert(entry.key.as_str()) {
            return Err(PipelineError::InvalidEntry {
                key: entry.key.clone(),
                reason: "duplicate key",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ProcessedDocument {
        ProcessedDocument {
            file: "docs/01-intro.md".into(),
            slug: "Introduction".into(),
            title: "Introduction".into(),
            sections: vec![HeadingEntry {
                slug: "Introduction-Setup".into(),
                title: "Setup".into(),
                sections: Vec::new(),
            }],
            blocks: Vec::new(),
        }
    }

    #[test]
    fn key_and_value() {
        let entry = KvEntry::from_document("svelte", Category::Docs, &document(), "<p>x</p>").unwrap();
        assert_eq!(entry.key, "svelte@docs@Introduction");

        let value: serde_json::Value = serde_json::from_str(&entry.value).unwrap();
        assert_eq!(value["title"], "Introduction");
        assert_eq!(value["file"], "docs/01-intro.md");
        assert_eq!(value["content"], "<p>x</p>");
        assert_eq!(value["sections"][0]["slug"], "Introduction-Setup");
        assert_eq!(value["sections"][0]["sections"], serde_json::json!([]));
    }

    #[test]
    fn rejects_duplicate_and_empty() {
        let a = KvEntry {
            key: "p@docs@a".into(),
            value: "{}".into(),
        };
        assert!(check_entries([&a]).is_ok());
        assert!(matches!(
            check_entries([&a, &a]),
            Err(PipelineError::InvalidEntry { reason: "duplicate key", .. })
        ));

        let empty = KvEntry {
            key: "p@docs@b".into(),
            value: String::new(),
        };
        assert!(matches!(
            check_entries([&empty]),
            Err(PipelineError::InvalidEntry { reason: "empty value", .. })
        ));
    }
}
