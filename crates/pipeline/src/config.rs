//! Run configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use docsmith_core::SlugConfig;

use crate::PipelineError;

const DEFAULT_DOCS_PATH: &str = "documentation";
const DEFAULT_PKG_PATH: &str = "packages";

/// Settings for one run over a checked-out repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Documentation root relative to the repository root.
    pub docs_path: String,
    /// Packages directory relative to the repository root.
    pub pkg_path: String,
    /// Overrides the project name derived from the repository.
    pub project_name: Option<String>,
    /// Slug strategy and separators.
    pub slug: SlugConfig,
    /// Packages left out of README fallback mode.
    pub ignore_packages: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            docs_path: DEFAULT_DOCS_PATH.to_string(),
            pkg_path: DEFAULT_PKG_PATH.to_string(),
            project_name: None,
            slug: SlugConfig::default(),
            ignore_packages: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|err| PipelineError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json(&text).map_err(|err| PipelineError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Parses a JSON configuration string.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Project name for the repository at `root`: the override if set,
    /// otherwise the directory name.
    pub fn project_name_for(&self, root: &Path) -> String {
        if let Some(name) = self.project_name.as_deref().filter(|name| !name.is_empty()) {
            return name.to_string();
        }
        root.canonicalize()
            .ok()
            .as_deref()
            .unwrap_or(root)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "docs".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.docs_path, "documentation");
        assert_eq!(config.pkg_path, "packages");
        assert_eq!(config.slug.heading_separator, "-");
        assert_eq!(config.slug.title_separator, "_");
        assert!(!config.slug.preserve_unicode);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            PipelineConfig::from_json(r#"{ "docs_path": "site/docs", "slug": { "preserve_unicode": true } }"#)
                .unwrap();
        assert_eq!(config.docs_path, "site/docs");
        assert_eq!(config.pkg_path, "packages");
        assert!(config.slug.preserve_unicode);
        assert_eq!(config.slug.heading_separator, "-");
    }

    #[test]
    fn project_name_prefers_override() {
        let config = PipelineConfig {
            project_name: Some("svelte".into()),
            ..PipelineConfig::default()
        };
        assert_eq!(config.project_name_for(Path::new("/tmp/whatever")), "svelte");
    }

    #[test]
    fn project_name_falls_back_to_directory() {
        let config = PipelineConfig::default();
        assert_eq!(config.project_name_for(Path::new("/definitely/missing/kit")), "kit");
    }
}
