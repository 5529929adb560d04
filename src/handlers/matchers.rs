//! Sibling matchers
//!
//! A sibling matcher compares a field that sits next to a matched reference
//! value (the `kind`, `apiGroup` or `namespace` alongside a `name`) against a
//! candidate target. All matchers declared on a rule must agree for the
//! candidate to be accepted.
//!
//! Matchers receive everything they need as arguments. A sibling that is not
//! present in the source document arrives as `None`; each matcher decides
//! what absence means.

use crate::models::Resource;
use serde_json::{Map, Value};
use std::sync::Arc;

/// API group that RBAC subjects of kind User and Group default to
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// Subject kinds a RoleBinding may name
const SUBJECT_KINDS: &[&str] = &["User", "Group", "ServiceAccount"];

/// Predicate over a source resource, a candidate target and the sibling context
#[cfg_attr(test, mockall::automock)]
pub trait SiblingMatcher: Send + Sync {
    /// `value` is the sibling field's value, `siblings` the whole parent mapping
    fn matches<'a>(
        &self,
        source: &Resource,
        target: &Resource,
        value: Option<&'a Value>,
        siblings: &Map<String, Value>,
    ) -> bool;
}

/// Sibling value must equal the target's kind
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetKind;

impl SiblingMatcher for TargetKind {
    fn matches(
        &self,
        _source: &Resource,
        target: &Resource,
        value: Option<&Value>,
        _siblings: &Map<String, Value>,
    ) -> bool {
        value.and_then(Value::as_str) == Some(target.kind())
    }
}

/// Sibling value names the target's API group; absent means the core group
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetGroup;

impl SiblingMatcher for TargetGroup {
    fn matches(
        &self,
        _source: &Resource,
        target: &Resource,
        value: Option<&Value>,
        _siblings: &Map<String, Value>,
    ) -> bool {
        value.and_then(Value::as_str).unwrap_or("") == target.api_group()
    }
}

/// Sibling value must equal the target's namespace; absent matches only
/// resources that declare no namespace
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetNamespace;

impl SiblingMatcher for TargetNamespace {
    fn matches(
        &self,
        _source: &Resource,
        target: &Resource,
        value: Option<&Value>,
        _siblings: &Map<String, Value>,
    ) -> bool {
        value.and_then(Value::as_str) == target.namespace()
    }
}

/// Target must live in the source's namespace; the sibling value is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct SameNamespace;

impl SiblingMatcher for SameNamespace {
    fn matches(
        &self,
        source: &Resource,
        target: &Resource,
        _value: Option<&Value>,
        _siblings: &Map<String, Value>,
    ) -> bool {
        source.namespace() == target.namespace()
    }
}

/// RBAC subject `kind`: one of User, Group, ServiceAccount and equal to the target kind
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectKind;

impl SiblingMatcher for SubjectKind {
    fn matches(
        &self,
        _source: &Resource,
        target: &Resource,
        value: Option<&Value>,
        _siblings: &Map<String, Value>,
    ) -> bool {
        value
            .and_then(Value::as_str)
            .is_some_and(|kind| SUBJECT_KINDS.contains(&kind) && kind == target.kind())
    }
}

/// RBAC subject `apiGroup`
///
/// An explicit group must match the target's group. Without one, User and
/// Group subjects default to `rbac.authorization.k8s.io` and everything else
/// to the core group.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectGroup;

impl SiblingMatcher for SubjectGroup {
    fn matches(
        &self,
        _source: &Resource,
        target: &Resource,
        value: Option<&Value>,
        siblings: &Map<String, Value>,
    ) -> bool {
        let group = match value.and_then(Value::as_str) {
            Some(group) => group,
            None if is_user_or_group(siblings) => RBAC_API_GROUP,
            None => "",
        };
        target.api_group() == group
    }
}

/// RBAC subject `namespace`
///
/// User and Group subjects are cluster scoped and must not declare a
/// namespace; an empty string counts as undeclared. Other subjects must name the target's namespace exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectNamespace;

impl SiblingMatcher for SubjectNamespace {
    fn matches(
        &self,
        _source: &Resource,
        target: &Resource,
        value: Option<&Value>,
        siblings: &Map<String, Value>,
    ) -> bool {
        if is_user_or_group(siblings) {
            return value.is_none_or(|v| v.is_null() || v.as_str() == Some(""));
        }
        value.and_then(Value::as_str) == target.namespace()
    }
}

fn is_user_or_group(siblings: &Map<String, Value>) -> bool {
    matches!(
        siblings.get("kind").and_then(Value::as_str),
        Some("User") | Some("Group")
    )
}

/// Look up a built-in matcher by the name used in handler files
pub fn named(name: &str) -> Option<Arc<dyn SiblingMatcher>> {
    let matcher: Arc<dyn SiblingMatcher> = match name {
        "targetKind" => Arc::new(TargetKind),
        "targetGroup" => Arc::new(TargetGroup),
        "targetNamespace" => Arc::new(TargetNamespace),
        "sameNamespace" => Arc::new(SameNamespace),
        "subjectKind" => Arc::new(SubjectKind),
        "subjectGroup" => Arc::new(SubjectGroup),
        "subjectNamespace" => Arc::new(SubjectNamespace),
        _ => return None,
    };
    Some(matcher)
}

/// Names accepted by [`named`]
pub fn names() -> &'static [&'static str] {
    &[
        "targetKind",
        "targetGroup",
        "targetNamespace",
        "sameNamespace",
        "subjectKind",
        "subjectGroup",
        "subjectNamespace",
    ]
}
