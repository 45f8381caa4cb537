//! Package README fallback.
//!
//! A repository without a categorized docs tree still documents itself
//! through its package manifest and README.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::DocsmithError;
use crate::increment::increment_headings;

/// README headings start at `#`; document bodies start at `###`.
pub const README_HEADING_SHIFT: usize = 2;

const MANIFEST_FILE: &str = "package.json";
const README_FILE: &str = "README.md";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: String,
    #[serde(default)]
    private: bool,
}

/// A package name paired with its normalized README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReadme {
    /// Package name with any `@scope/` prefix stripped.
    pub name: String,
    /// README text with headings shifted into the document range.
    pub readme: String,
}

/// Strips an npm `@scope/` prefix from a package name.
///
/// ```
/// use docsmith_core::readme::strip_scope;
///
/// assert_eq!(strip_scope("@sveltejs/kit"), "kit");
/// assert_eq!(strip_scope("svelte"), "svelte");
/// ```
pub fn strip_scope(name: &str) -> &str {
    match name.strip_prefix('@').and_then(|scoped| scoped.split_once('/')) {
        Some((_, bare)) if !bare.is_empty() => bare,
        _ => name,
    }
}

/// Reads the manifest and README in `dir`.
///
/// Private packages yield `Ok(None)`.
pub fn read_package(dir: &Path) -> Result<Option<PackageReadme>, DocsmithError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest = fs::read_to_string(&manifest_path)
        .map_err(|err| DocsmithError::unreadable(&manifest_path, err))?;
    let manifest: PackageManifest =
        serde_json::from_str(&manifest).map_err(|err| DocsmithError::Manifest {
            path: manifest_path.clone(),
            message: err.to_string(),
        })?;

    if manifest.private {
        log::debug!("skipping private package {}", manifest.name);
        return Ok(None);
    }

    let readme_path = dir.join(README_FILE);
    let readme = fs::read_to_string(&readme_path)
        .map_err(|err| DocsmithError::unreadable(&readme_path, err))?;

    Ok(Some(PackageReadme {
        name: strip_scope(&manifest.name).to_string(),
        readme: increment_headings(&readme, README_HEADING_SHIFT),
    }))
}

/// Collects the README of every public package under `root/pkg_path`.
///
/// Packages that are private, unreadable, or named in `ignore` (bare or
/// scoped) are skipped. A missing packages directory yields no packages.
pub fn package_documentation(
    root: &Path,
    pkg_path: &str,
    ignore: &[String],
) -> Result<Vec<PackageReadme>, DocsmithError> {
    let pkg_dir = root.join(pkg_path);
    let Ok(entries) = fs::read_dir(&pkg_dir) else {
        log::debug!("no packages directory at {}", pkg_dir.display());
        return Ok(Vec::new());
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| DocsmithError::unreadable(&pkg_dir, err))?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    let mut packages = Vec::new();
    for dir in dirs {
        match read_package(&dir) {
            Ok(Some(package)) if is_ignored(&package.name, ignore) => {
                log::debug!("ignoring package {}", package.name);
            }
            Ok(Some(package)) => packages.push(package),
            Ok(None) => {}
            Err(err) => log::debug!("skipping package at {}: {err}", dir.display()),
        }
    }
    Ok(packages)
}

fn is_ignored(name: &str, ignore: &[String]) -> bool {
    ignore
        .iter()
        .any(|ignored| ignored == name || strip_scope(ignored) == name)
}
