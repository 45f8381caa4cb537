//! Processing every document of one project.

use docsmith_core::{
    Category, DocsmithError, SessionGroup, SimpleFile, SourceDocument, process_document,
};
use docsmith_html::render_document;

use crate::entry::KvEntry;
use crate::source::ProjectSource;
use crate::{PipelineConfig, PipelineError};

/// File name used for README projects.
pub const README_DOCUMENT: &str = "README.md";

/// Files whose names start with this prefix are drafts.
const DRAFT_PREFIX: &str = "xx";

/// A document that could not be processed.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Category the document belongs to.
    pub category: Category,
    /// Path relative to the docs root.
    pub file: String,
    /// What went wrong.
    pub error: DocsmithError,
}

/// Everything one project produced.
#[derive(Debug, Default)]
pub struct ProjectOutput {
    /// Project name.
    pub project: String,
    /// One entry per processed document, in processing order.
    pub entries: Vec<KvEntry>,
    /// Documents that failed.
    pub failures: Vec<DocumentFailure>,
    /// Documents left out because their category is not supported.
    pub skipped: usize,
}

impl ProjectOutput {
    fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            ..Self::default()
        }
    }

    /// Number of documents attempted.
    pub fn attempted(&self) -> usize {
        self.entries.len() + self.failures.len()
    }
}

/// Lists the markdown files of a category as `(category/relative/path, text)`,
/// depth-first in name order. Drafts and non-markdown files are left out.
pub fn document_files<'a>(category: Category, entries: &'a [SimpleFile]) -> Vec<(String, &'a str)> {
    let mut files = Vec::new();
    for entry in entries {
        entry.walk_files(category.as_str(), &mut files);
    }
    files.retain(|(path, _)| {
        let name = path.rsplit('/').next().unwrap_or(path);
        let keep = name.ends_with(".md") && !name.starts_with(DRAFT_PREFIX);
        if !keep {
            log::debug!("skipping {path}");
        }
        keep
    });
    files
}

/// Processes one project.
///
/// All documents of the project share one [`SessionGroup`], so slugs are
/// unique across the whole project. A failing document is recorded and the
/// remaining documents are still processed.
pub fn process_project(
    source: &ProjectSource,
    config: &PipelineConfig,
) -> Result<ProjectOutput, PipelineError> {
    let sessions = SessionGroup::new(&config.slug);
    let mut output = ProjectOutput::new(source.name());

    match source {
        ProjectSource::Docs { collection, .. } => {
            for (category, entries) in collection.iter() {
                let files = document_files(category, entries);
                if !category.is_supported() {
                    log::warn!(
                        "{}: {category} is not supported yet, skipping {} documents",
                        output.project,
                        files.len()
                    );
                    output.skipped += files.len();
                    continue;
                }
                for (file, content) in &files {
                    process_one(&mut output, &sessions, category, file, content)?;
                }
            }
        }
        ProjectSource::Readme { readme, .. } => {
            process_one(&mut output, &sessions, Category::Docs, README_DOCUMENT, readme)?;
        }
    }

    log::info!(
        "{}: {} documents processed, {} failed",
        output.project,
        output.entries.len(),
        output.failures.len()
    );
    Ok(output)
}

fn process_one(
    output: &mut ProjectOutput,
    sessions: &SessionGroup,
    category: Category,
    file: &str,
    content: &str,
) -> Result<(), PipelineError> {
    let source = SourceDocument {
        file,
        content,
        page: category.as_str(),
    };

    match process_document(source, sessions) {
        Ok(document) => {
            let html = render_document(&document);
            let entry = KvEntry::from_document(&output.project, category, &document, &html)?;
            log::debug!("{} -> {}", file, entry.key);
            output.entries.push(entry);
        }
        Err(error) => {
            log::warn!("{}: {error}", output.project);
            output.failures.push(DocumentFailure {
                category,
                file: file.to_string(),
                error,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmith_core::{DocsCollection, SimpleContent};

    fn file(name: &str, text: &str) -> SimpleFile {
        SimpleFile {
            name: name.into(),
            content: SimpleContent::Text(text.into()),
        }
    }

    fn dir(name: &str, entries: Vec<SimpleFile>) -> SimpleFile {
        SimpleFile {
            name: name.into(),
            content: SimpleContent::Entries(entries),
        }
    }

    fn docs(collection: DocsCollection) -> ProjectSource {
        ProjectSource::Docs {
            name: "svelte".into(),
            collection,
        }
    }

    #[test]
    fn lists_markdown_files_in_order() {
        let entries = vec![
            file("01-intro.md", "a"),
            dir("02-guide", vec![file("01-setup.md", "b"), file("logo.png", "c")]),
            file("xx-draft.md", "d"),
        ];
        let files = document_files(Category::Docs, &entries);
        let paths: Vec<_> = files.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, ["docs/01-intro.md", "docs/02-guide/01-setup.md"]);
    }

    #[test]
    fn processes_supported_categories() {
        let mut collection = DocsCollection::default();
        collection.insert(
            Category::Docs,
            vec![
                file("01-intro.md", "---\ntitle: Introduction\n---\n\n### Setup\n\ntext\n"),
                file("02-api.md", "### Setup\n"),
            ],
        );
        collection.insert(Category::Faq, vec![file("01-why.md", "### Because\n")]);
        collection.insert(Category::Examples, vec![file("hello.md", "### Hello\n")]);

        let output = process_project(&docs(collection), &PipelineConfig::default()).unwrap();

        let keys: Vec<_> = output.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["svelte@docs@Introduction", "svelte@docs@Api", "svelte@faq@Why"]);
        assert!(output.failures.is_empty());
        assert_eq!(output.skipped, 1);
        assert_eq!(output.attempted(), 3);
        assert!(output.entries[0].value.contains("docs#Introduction-Setup"));
    }

    #[test]
    fn failing_document_does_not_stop_project() {
        let mut collection = DocsCollection::default();
        collection.insert(
            Category::Docs,
            vec![
                file("01-bad.md", "## Too shallow\n"),
                file("02-good.md", "### Fine\n"),
            ],
        );

        let output = process_project(&docs(collection), &PipelineConfig::default()).unwrap();

        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].file, "docs/01-bad.md");
        assert!(matches!(
            output.failures[0].error.root_cause(),
            DocsmithError::InvalidHeadingDepth { depth: 2, .. }
        ));
    }

    #[test]
    fn duplicate_titles_across_categories_fail() {
        let mut collection = DocsCollection::default();
        collection.insert(Category::Docs, vec![file("intro.md", "### A\n")]);
        collection.insert(Category::Faq, vec![file("intro.md", "### B\n")]);

        let output = process_project(&docs(collection), &PipelineConfig::default()).unwrap();

        assert_eq!(output.entries.len(), 1);
        assert_eq!(
            output.failures[0].error.to_string(),
            "faq/intro.md: Duplicate slug Intro"
        );
    }

    #[test]
    fn readme_project_is_one_docs_document() {
        let source = ProjectSource::Readme {
            name: "kit".into(),
            readme: "### kit\n\n#### Install\n".into(),
        };
        let output = process_project(&source, &PipelineConfig::default()).unwrap();

        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].key, "kit@docs@README");
    }
}
