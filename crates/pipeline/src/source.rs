//! Gathering the projects of a checked-out repository.

use std::collections::HashSet;
use std::path::Path;

use docsmith_core::readme::{package_documentation, read_package};
use docsmith_core::{DocsCollection, FileNode, classify, read_tree};

use crate::{PipelineConfig, PipelineError};

/// Documentation of one project, ready to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    /// A categorized documentation tree.
    Docs {
        /// Project name.
        name: String,
        /// Categories found under the docs root.
        collection: DocsCollection,
    },
    /// A package README, already shifted into the document heading range.
    Readme {
        /// Project or package name.
        name: String,
        /// Normalized README text.
        readme: String,
    },
}

impl ProjectSource {
    /// Project name.
    pub fn name(&self) -> &str {
        match self {
            ProjectSource::Docs { name, .. } | ProjectSource::Readme { name, .. } => name,
        }
    }
}

/// Reads the repository at `root` into project sources.
///
/// A docs tree with at least one category yields a single project. Otherwise
/// the root package README and every package README under the packages
/// directory each become a project of their own. Project names are unique:
/// a package sharing its name with an earlier project (usually the root
/// package) is skipped with a warning.
pub fn gather(root: &Path, config: &PipelineConfig) -> Result<Vec<ProjectSource>, PipelineError> {
    let project = config.project_name_for(root);
    let collection = read_collection(root, config, &project)?;

    if !collection.is_empty() {
        log::info!("{project}: found {} documentation categories", collection.len());
        return Ok(vec![ProjectSource::Docs {
            name: project,
            collection,
        }]);
    }

    log::info!("{project}: no documentation categories, falling back to READMEs");
    readme_sources(root, config)
}

fn read_collection(
    root: &Path,
    config: &PipelineConfig,
    project: &str,
) -> Result<DocsCollection, PipelineError> {
    let docs_dir = root.join(&config.docs_path);
    if !docs_dir.is_dir() {
        log::debug!("{project}: no docs directory at {}", docs_dir.display());
        return Ok(DocsCollection::default());
    }

    // Only the docs subtree is read; it is mounted under a synthetic root so
    // the classifier sees the same shape as a full checkout.
    let docs_tree = read_tree(&docs_dir)?;
    let docs_name = docs_tree.name.clone();
    let tree = FileNode::dir(project, vec![docs_tree]);
    let (_, collection) = classify(&tree, &docs_name, &config.pkg_path, project);
    Ok(collection)
}

fn readme_sources(root: &Path, config: &PipelineConfig) -> Result<Vec<ProjectSource>, PipelineError> {
    let mut sources = Vec::new();

    match read_package(root) {
        Ok(Some(package)) => sources.push(ProjectSource::Readme {
            name: config.project_name.clone().unwrap_or(package.name),
            readme: package.readme,
        }),
        Ok(None) => log::info!("root package is private, skipping its README"),
        Err(err) => log::warn!("no usable root README: {err}"),
    }

    let mut names: HashSet<String> = sources.iter().map(|s| s.name().to_string()).collect();
    for package in package_documentation(root, &config.pkg_path, &config.ignore_packages)? {
        if !names.insert(package.name.clone()) {
            log::warn!(
                "{}/{}: project name already taken, skipping its README",
                config.pkg_path,
                package.name
            );
            continue;
        }
        sources.push(ProjectSource::Readme {
            name: package.name,
            readme: package.readme,
        });
    }

    Ok(sources)
}
