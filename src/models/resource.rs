//! Parsed manifest documents
//!
//! A [`Resource`] wraps one YAML document together with its identity. The
//! document tree is the only source of truth: kind, name, namespace and
//! apiVersion are read from it whenever it is replaced.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Kind of kustomize's `kustomization.yaml` documents
pub const KUSTOMIZATION_KIND: &str = "Kustomization";

/// One Kubernetes manifest document plus identity metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    id: String,
    file_path: PathBuf,
    kind: String,
    api_version: String,
    name: String,
    namespace: Option<String>,
    #[serde(skip)]
    content: Value,
}

impl Resource {
    /// Create a resource from an already parsed document tree
    pub fn new(id: impl Into<String>, file_path: impl Into<PathBuf>, content: Value) -> Self {
        let mut resource = Self {
            id: id.into(),
            file_path: file_path.into(),
            kind: String::new(),
            api_version: String::new(),
            name: String::new(),
            namespace: None,
            content: Value::Null,
        };
        resource.set_content(content);
        resource
    }

    /// Replace the document tree wholesale
    ///
    /// Identity fields are re-read from the new content. Any graph built
    /// from the old content is stale after this call and must be rebuilt.
    /// A Kustomization without `metadata.name` is named after its folder.
    pub fn set_content(&mut self, content: Value) {
        self.kind = string_at(&content, &["kind"]).unwrap_or_default();
        self.api_version = string_at(&content, &["apiVersion"]).unwrap_or_default();
        self.name = string_at(&content, &["metadata", "name"])
            .or_else(|| match self.kind.as_str() {
                KUSTOMIZATION_KIND => folder_name(&self.file_path),
                _ => None,
            })
            .unwrap_or_default();
        self.namespace = string_at(&content, &["metadata", "namespace"]);
        self.content = content;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// API group part of apiVersion ("" for the core group)
    ///
    /// `rbac.authorization.k8s.io/v1` yields `rbac.authorization.k8s.io`,
    /// `v1` yields an empty string.
    pub fn api_group(&self) -> &str {
        self.api_version
            .rsplit_once('/')
            .map(|(group, _)| group)
            .unwrap_or("")
    }

    /// `metadata.labels`, if present and a mapping
    pub fn labels(&self) -> Option<&Map<String, Value>> {
        self.content
            .get("metadata")
            .and_then(|m| m.get("labels"))
            .and_then(|l| l.as_object())
    }

    /// `metadata.uid`, if present
    pub fn uid(&self) -> Option<&str> {
        self.content
            .get("metadata")
            .and_then(|m| m.get("uid"))
            .and_then(|u| u.as_str())
    }

    /// Human-readable `Kind/namespace/name` label
    pub fn display_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}/{}", self.kind, ns, self.name),
            None => format!("{}/{}", self.kind, self.name),
        }
    }
}

fn folder_name(file_path: &Path) -> Option<String> {
    file_path
        .parent()
        .and_then(Path::file_name)
        .or_else(|| file_path.file_stem())
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

fn string_at(content: &Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(content, |node, key| node.get(*key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
