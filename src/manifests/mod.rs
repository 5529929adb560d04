//! Manifest loading
//!
//! Reads Kubernetes YAML manifests into [`Resource`]s. A file may hold many
//! documents; each document that carries a `kind` and a `metadata.name`
//! (a Kustomization needs only its kind) becomes one resource with id `"{file}#{index}"`, where `index` is the
//! document's position in the stream.

use crate::config::Config;
use crate::models::{KUSTOMIZATION_KIND, Resource};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Manifest loading errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Scan root does not exist: {0}")]
    MissingRoot(PathBuf),
}

/// Parse every resource in a multi-document YAML stream
///
/// A syntax error anywhere fails the whole stream.
pub fn parse_documents(file_path: &Path, text: &str) -> Result<Vec<Resource>, ManifestError> {
    let mut resources = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let content = Value::deserialize(document).map_err(|source| ManifestError::Yaml {
            path: file_path.to_path_buf(),
            source,
        })?;

        if content.is_null() {
            continue;
        }
        if !has_identity(&content) {
            tracing::warn!(
                "Skipping document {} in {}: missing kind or metadata.name",
                index,
                file_path.display()
            );
            continue;
        }

        let id = format!("{}#{}", file_path.display(), index);
        resources.push(Resource::new(id, file_path, content));
    }

    Ok(resources)
}

/// Kustomizations are usually unnamed and identified by their folder instead
fn has_identity(content: &Value) -> bool {
    fn text(v: Option<&Value>) -> Option<&str> {
        v.and_then(Value::as_str).filter(|s| !s.is_empty())
    }
    match text(content.get("kind")) {
        Some(KUSTOMIZATION_KIND) => true,
        Some(_) => text(content.get("metadata").and_then(|m| m.get("name"))).is_some(),
        None => false,
    }
}

/// Load a single manifest file
pub fn load_file(path: &Path) -> Result<Vec<Resource>, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_documents(path, &text)
}

/// Load every included manifest below `root`
///
/// Files are visited in sorted path order and identified by their path
/// relative to `root`, or by their file name when `root` is a file. Unreadable or malformed files are logged and skipped.
pub fn scan_folder(root: &Path, config: &Config) -> Result<Vec<Resource>, ManifestError> {
    if !root.exists() {
        return Err(ManifestError::MissingRoot(root.to_path_buf()));
    }

    tracing::info!("Scanning {}", root.display());
    let includes = build_globset(&config.file_includes);

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e, &config.scan_excludes));

    let mut resources = Vec::new();
    let mut skipped = 0usize;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Cannot walk entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_included(&entry, includes.as_ref()) {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            // the root itself is the file
            _ => Path::new(entry.file_name()),
        };
        let parsed = std::fs::read_to_string(entry.path())
            .map_err(|source| ManifestError::Io {
                path: entry.path().to_path_buf(),
                source,
            })
            .and_then(|text| parse_documents(relative, &text));

        match parsed {
            Ok(found) => {
                tracing::debug!("{}: {} resources", relative.display(), found.len());
                resources.extend(found);
            }
            Err(err) => {
                skipped += 1;
                tracing::warn!("Skipping file: {}", err);
            }
        }
    }

    tracing::info!(
        "Loaded {} resources from {} ({} files skipped)",
        resources.len(),
        root.display(),
        skipped
    );
    Ok(resources)
}

fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => tracing::warn!("Ignoring include pattern '{}': {}", pattern, err),
        }
    }
    builder.build().ok()
}

/// Include patterns apply to the file name
fn is_included(entry: &DirEntry, includes: Option<&GlobSet>) -> bool {
    includes.is_some_and(|set| set.is_match(entry.file_name()))
}

fn is_excluded(entry: &DirEntry, excludes: &[String]) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| excludes.iter().any(|e| e == name))
}
