#![deny(missing_docs)]
//! docsmith pipeline: configuration, per-project runs, and storage entries.

/// Parallel batch runs and statistics.
pub mod batch;
/// Run configuration.
pub mod config;
/// Key/value storage entries.
pub mod entry;
/// Pipeline error type.
pub mod error;
/// Per-project processing.
pub mod project;
/// Project discovery.
pub mod source;

pub use batch::{BatchOptions, BatchResult, BatchStats, run, run_sources};
pub use config::PipelineConfig;
pub use entry::{KvEntry, StoredDocument, check_entries, entry_key};
pub use error::PipelineError;
pub use project::{DocumentFailure, ProjectOutput, document_files, process_project};
pub use source::{ProjectSource, gather};
