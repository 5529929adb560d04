//! Resolved and unresolved references

use super::RefType;
use serde::Serialize;
use serde_json::Value;

/// One resolved directed relationship between two resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEdge {
    pub source_id: String,
    pub target_id: String,
    pub ref_type: RefType,
    /// Concrete location of the matched value in the source, e.g. `subjects[0].name`
    pub path: String,
    /// Index of the producing rule within the source's kind handler
    pub rule_index: usize,
}

/// A reference value that was found in a source but matched no resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedRef {
    pub source_id: String,
    pub ref_type: RefType,
    pub path: String,
    pub value: Value,
    pub rule_index: usize,
    /// Target kind pattern of the rule, as written in the catalog
    pub target_kind: String,
}
