//! Running every project of a repository in parallel.

use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use crate::entry::{KvEntry, check_entries};
use crate::project::{DocumentFailure, ProjectOutput, process_project};
use crate::source::{ProjectSource, gather};
use crate::{PipelineConfig, PipelineError};

/// Options for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Maximum number of worker threads. Defaults to the rayon global pool.
    pub max_threads: Option<usize>,
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Number of projects processed.
    pub projects: u32,
    /// Number of documents that produced an entry.
    pub succeeded: u32,
    /// Number of documents that failed.
    pub failed: u32,
    /// Number of documents in unsupported categories.
    pub skipped: u32,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Per-project output, in source order.
    pub projects: Vec<ProjectOutput>,
    /// Processing statistics.
    pub stats: BatchStats,
}

impl BatchResult {
    /// All storage entries, project by project.
    pub fn entries(&self) -> impl Iterator<Item = &KvEntry> {
        self.projects.iter().flat_map(|project| project.entries.iter())
    }

    /// All failed documents with their project name.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &DocumentFailure)> {
        self.projects.iter().flat_map(|project| {
            project
                .failures
                .iter()
                .map(move |failure| (project.project.as_str(), failure))
        })
    }

    /// True if any document failed.
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }
}

/// Gathers the projects under `root` and processes them.
pub fn run(
    root: &Path,
    config: &PipelineConfig,
    options: &BatchOptions,
) -> Result<BatchResult, PipelineError> {
    let sources = gather(root, config)?;
    if sources.is_empty() {
        log::warn!("nothing to process under {}", root.display());
    }
    run_sources(sources, config, options)
}

/// Processes already gathered projects, one worker per project.
///
/// Documents inside a project stay sequential; storage entries are checked
/// once every project is done.
pub fn run_sources(
    sources: Vec<ProjectSource>,
    config: &PipelineConfig,
    options: &BatchOptions,
) -> Result<BatchResult, PipelineError> {
    let start = Instant::now();

    let pool = match options.max_threads {
        Some(threads) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|err| PipelineError::ThreadPool(err.to_string()))?,
        ),
        None => None,
    };

    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);
    let skipped = AtomicU32::new(0);

    let process_source = |source: &ProjectSource| -> Result<ProjectOutput, PipelineError> {
        let output = process_project(source, config)?;
        succeeded.fetch_add(count(output.entries.len()), Ordering::Relaxed);
        failed.fetch_add(count(output.failures.len()), Ordering::Relaxed);
        skipped.fetch_add(count(output.skipped), Ordering::Relaxed);
        Ok(output)
    };

    let projects = if let Some(pool) = pool {
        pool.install(|| {
            sources
                .par_iter()
                .map(process_source)
                .collect::<Result<Vec<_>, PipelineError>>()
        })?
    } else {
        sources
            .par_iter()
            .map(process_source)
            .collect::<Result<Vec<_>, PipelineError>>()?
    };

    let result = BatchResult {
        stats: BatchStats {
            projects: count(projects.len()),
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            skipped: skipped.load(Ordering::Relaxed),
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
        projects,
    };

    check_entries(result.entries())?;
    Ok(result)
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsmith_core::{Category, DocsCollection, SimpleContent, SimpleFile};

    fn project(name: &str, files: &[(&str, &str)]) -> ProjectSource {
        let mut collection = DocsCollection::default();
        collection.insert(
            Category::Docs,
            files
                .iter()
                .map(|(name, text)| SimpleFile {
                    name: name.to_string(),
                    content: SimpleContent::Text(text.to_string()),
                })
                .collect(),
        );
        ProjectSource::Docs {
            name: name.into(),
            collection,
        }
    }

    #[test]
    fn projects_have_independent_sessions() {
        let sources = vec![
            project("svelte", &[("intro.md", "### Start\n")]),
            project("kit", &[("intro.md", "### Start\n")]),
        ];
        let result = run_sources(
            sources,
            &PipelineConfig::default(),
            &BatchOptions {
                max_threads: Some(2),
            },
        )
        .unwrap();

        assert_eq!(result.stats.projects, 2);
        assert_eq!(result.stats.succeeded, 2);
        assert!(!result.has_failures());
        let keys: Vec<_> = result.entries().map(|entry| entry.key.as_str()).collect();
        assert_eq!(keys, ["svelte@docs@Intro", "kit@docs@Intro"]);
    }

    #[test]
    fn failures_are_counted() {
        let sources = vec![project("svelte", &[("a.md", "# Nope\n"), ("b.md", "### Ok\n")])];
        let result = run_sources(sources, &PipelineConfig::default(), &BatchOptions::default()).unwrap();

        assert_eq!(result.stats.succeeded, 1);
        assert_eq!(result.stats.failed, 1);
        assert!(result.has_failures());
        let (project, failure) = result.failures().next().unwrap();
        assert_eq!(project, "svelte");
        assert_eq!(failure.file, "docs/a.md");
    }

    #[test]
    fn empty_batch() {
        let result = run_sources(Vec::new(), &PipelineConfig::default(), &BatchOptions::default()).unwrap();
        assert_eq!(result.stats.projects, 0);
        assert_eq!(result.entries().count(), 0);
    }
}
