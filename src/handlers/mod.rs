// Kind handlers for kuberef
//
// A kind handler describes, for one Kubernetes kind, where its outgoing
// references live and which resources they may point at. Handlers come from
// the built-in catalog or from YAML handler files.

pub mod catalog;
pub mod manifest;
pub mod matchers;
pub mod pattern;
pub mod registry;
pub mod validator;

pub use manifest::HandlerLoader;
pub use matchers::SiblingMatcher;
pub use pattern::{ApiVersionMatcher, KindPattern, PathPart};
pub use registry::{HandlerRegistry, default_registry};
pub use validator::HandlerValidator;

use crate::models::RefType;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Handler errors
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid kind handler: {0}")]
    Invalid(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Duplicate kind handler for {kind} ({api_version})")]
    Duplicate { kind: String, api_version: String },

    #[error("Unknown sibling matcher '{0}'")]
    UnknownMatcher(String),

    #[error("Failed to load handler file {path}: {message}")]
    LoadError { path: PathBuf, message: String },
}

/// Result type for handler operations
pub type HandlerResult<T> = Result<T, HandlerError>;

/// A sibling field name paired with the matcher applied to it
#[derive(Clone)]
pub struct SiblingRule {
    pub field: String,
    pub matcher: Arc<dyn SiblingMatcher>,
}

impl fmt::Debug for SiblingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiblingRule")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Where a rule looks for reference values
#[derive(Debug, Clone)]
pub struct RefSource {
    pub path_parts: Vec<PathPart>,
    pub sibling_matchers: Vec<SiblingRule>,
}

/// What a rule may point at
#[derive(Debug, Clone)]
pub struct RefTarget {
    pub kind: KindPattern,
}

/// One declarative reference rule within a handler
#[derive(Debug, Clone)]
pub struct RefMapper {
    pub source: RefSource,
    pub target: RefTarget,
    pub ref_type: RefType,
}

impl RefMapper {
    /// Create a rule from a path written as segments, e.g. `["subjects", "*", "name"]`
    pub fn new(path: &[&str], target: KindPattern, ref_type: RefType) -> Self {
        Self::from_parts(PathPart::parse_all(path), target, ref_type)
    }

    pub fn from_parts(path_parts: Vec<PathPart>, target: KindPattern, ref_type: RefType) -> Self {
        Self {
            source: RefSource {
                path_parts,
                sibling_matchers: Vec::new(),
            },
            target: RefTarget { kind: target },
            ref_type,
        }
    }

    /// Add a sibling matcher for `field`
    pub fn with_sibling(self, field: &str, matcher: impl SiblingMatcher + 'static) -> Self {
        self.with_shared_sibling(field, Arc::new(matcher))
    }

    pub fn with_shared_sibling(mut self, field: &str, matcher: Arc<dyn SiblingMatcher>) -> Self {
        self.source.sibling_matchers.push(SiblingRule {
            field: field.to_string(),
            matcher,
        });
        self
    }

    /// Source path in catalog notation, e.g. `subjects.*.name`
    pub fn path_display(&self) -> String {
        self.source
            .path_parts
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Reference rules for one Kubernetes kind
#[derive(Debug, Clone)]
pub struct KindHandler {
    pub kind: String,
    pub api_version: ApiVersionMatcher,
    pub outgoing_ref_mappers: Vec<RefMapper>,
    pub help_link: Option<String>,
}

impl KindHandler {
    pub fn new(kind: impl Into<String>, api_version: ApiVersionMatcher) -> Self {
        Self {
            kind: kind.into(),
            api_version,
            outgoing_ref_mappers: Vec::new(),
            help_link: None,
        }
    }

    pub fn with_rule(mut self, rule: RefMapper) -> Self {
        self.outgoing_ref_mappers.push(rule);
        self
    }

    pub fn with_help_link(mut self, link: impl Into<String>) -> Self {
        self.help_link = Some(link.into());
        self
    }

    /// True when both handlers claim the same `(kind, apiVersion matcher)` key
    pub fn same_key(&self, other: &KindHandler) -> bool {
        self.kind == other.kind && self.api_version == other.api_version
    }
}
