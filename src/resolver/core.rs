//! Core reference resolution
//!
//! For every resource, applies its kind handler's rules against the whole
//! resource set and emits one edge per accepted target.

use super::path::{PathMatch, match_path};
use crate::handlers::{HandlerRegistry, RefMapper};
use crate::models::{RefType, ReferenceEdge, Resource, UnresolvedRef};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

/// File names kustomize looks for inside a folder
const KUSTOMIZATION_FILES: &[&str] = &["kustomization.yaml", "kustomization.yml", "Kustomization"];

/// Edges plus the reference values that found no target
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub edges: Vec<ReferenceEdge>,
    pub unresolved: Vec<UnresolvedRef>,
}

impl Resolution {
    fn append(&mut self, mut other: Resolution) {
        self.edges.append(&mut other.edges);
        self.unresolved.append(&mut other.unresolved);
    }
}

/// Resolve all outgoing references of `resources`
///
/// Edges are ordered by source position in `resources`, then rule order,
/// then match order, then target position.
pub fn resolve(registry: &HandlerRegistry, resources: &[Resource]) -> Vec<ReferenceEdge> {
    resolve_with_report(registry, resources).edges
}

/// Like [`resolve`], also reporting values that matched no resource
pub fn resolve_with_report(registry: &HandlerRegistry, resources: &[Resource]) -> Resolution {
    let mut resolution = Resolution::default();
    for source in resources {
        resolution.append(resolve_resource(registry, source, resources));
    }
    tracing::debug!(
        "Resolved {} edges ({} unresolved) across {} resources",
        resolution.edges.len(),
        resolution.unresolved.len(),
        resources.len()
    );
    resolution
}

/// Resolve on the rayon pool; output is identical to [`resolve`]
pub fn resolve_parallel(registry: &HandlerRegistry, resources: &[Resource]) -> Vec<ReferenceEdge> {
    resolve_parallel_with_report(registry, resources).edges
}

/// Like [`resolve_with_report`], evaluating resources in parallel
pub fn resolve_parallel_with_report(
    registry: &HandlerRegistry,
    resources: &[Resource],
) -> Resolution {
    let per_resource: Vec<Resolution> = resources
        .par_iter()
        .map(|source| resolve_resource(registry, source, resources))
        .collect();

    let mut resolution = Resolution::default();
    for part in per_resource {
        resolution.append(part);
    }
    tracing::debug!(
        "Resolved {} edges ({} unresolved) across {} resources in parallel",
        resolution.edges.len(),
        resolution.unresolved.len(),
        resources.len()
    );
    resolution
}

/// Outgoing references of a single resource
pub fn resolve_resource(
    registry: &HandlerRegistry,
    source: &Resource,
    resources: &[Resource],
) -> Resolution {
    let mut resolution = Resolution::default();
    let Some(handler) = registry.lookup(source.kind(), source.api_version()) else {
        return resolution;
    };

    for (rule_index, rule) in handler.outgoing_ref_mappers.iter().enumerate() {
        let matches = match_path(source.content(), &rule.source.path_parts);
        tracing::trace!(
            "{}: rule {} ({}) matched {} values",
            source.id(),
            rule_index,
            rule.path_display(),
            matches.len()
        );

        for path_match in &matches {
            let before = resolution.edges.len();
            for target in resources {
                if target.id() == source.id() {
                    continue;
                }
                if accepts(rule, source, target, path_match) {
                    resolution.edges.push(ReferenceEdge {
                        source_id: source.id().to_string(),
                        target_id: target.id().to_string(),
                        ref_type: rule.ref_type,
                        path: path_match.location.clone(),
                        rule_index,
                    });
                }
            }

            if resolution.edges.len() == before && !path_match.value.is_null() {
                resolution.unresolved.push(UnresolvedRef {
                    source_id: source.id().to_string(),
                    ref_type: rule.ref_type,
                    path: path_match.location.clone(),
                    value: path_match.value.clone(),
                    rule_index,
                    target_kind: rule.target.kind.to_string(),
                });
            }
        }
    }

    resolution
}

/// Whether `target` satisfies `rule` for one matched value
fn accepts(rule: &RefMapper, source: &Resource, target: &Resource, path_match: &PathMatch) -> bool {
    if !rule.target.kind.matches(target.kind()) {
        return false;
    }
    if !value_matches(rule.ref_type, path_match.value, source, target) {
        return false;
    }

    let no_siblings = Map::new();
    let siblings = path_match.siblings.unwrap_or(&no_siblings);
    rule.source.sibling_matchers.iter().all(|sibling| {
        sibling
            .matcher
            .matches(source, target, siblings.get(&sibling.field), siblings)
    })
}

/// Compare a matched value against a target according to the reference type
///
/// Only [`RefType::File`] looks at `source`, to resolve relative paths.
pub fn value_matches(
    ref_type: RefType,
    value: &Value,
    source: &Resource,
    target: &Resource,
) -> bool {
    match ref_type {
        RefType::Name => value.as_str().is_some_and(|name| name == target.name()),
        RefType::Owner => value
            .as_str()
            .is_some_and(|uid| target.uid() == Some(uid)),
        RefType::Selector => {
            let Some(selector) = value.as_object().filter(|s| !s.is_empty()) else {
                return false;
            };
            target.labels().is_some_and(|labels| {
                selector
                    .iter()
                    .all(|(key, expected)| labels.get(key) == Some(expected))
            })
        }
        RefType::File => value
            .as_str()
            .filter(|entry| !entry.is_empty())
            .is_some_and(|entry| includes_file(source.file_path(), entry, target.file_path())),
    }
}

/// Whether `entry`, relative to the folder of `source_file`, names `target_file`
/// or the folder holding it as a kustomization file
fn includes_file(source_file: &Path, entry: &str, target_file: &Path) -> bool {
    let folder = source_file.parent().unwrap_or(Path::new(""));
    let included = normalize(&folder.join(entry));
    let target_file = normalize(target_file);

    if target_file == included {
        return true;
    }
    target_file.parent() == Some(included.as_path())
        && target_file
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| KUSTOMIZATION_FILES.contains(&name))
}

/// Lexically resolve `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if out.file_name().is_some() => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
