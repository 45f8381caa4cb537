use std::path::PathBuf;
use thiserror::Error;

use docsmith_core::DocsmithError;

/// Errors that stop a run before or after documents are processed.
///
/// Failures inside a single document never surface here; they are collected
/// per project instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading or classifying the working directory failed.
    #[error(transparent)]
    Core(#[from] DocsmithError),
    /// A configuration file that could not be read or parsed.
    #[error("Invalid configuration {}: {message}", path.display())]
    Config {
        /// Configuration file path.
        path: PathBuf,
        /// Error message
        message: String,
    },
    /// A storage entry that cannot be written.
    #[error("Invalid storage entry {key:?}: {reason}")]
    InvalidEntry {
        /// Offending key.
        key: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A processed document could not be serialized.
    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        /// Key of the entry being built.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}
