//! Path matching over document trees
//!
//! Walks a resource's content along a sequence of [`PathPart`]s and returns
//! every value reached, together with its concrete location and the mapping
//! it sits in. Missing keys and type mismatches end that branch of the walk
//! quietly; they never abort the other branches.

use crate::handlers::PathPart;
use serde_json::{Map, Value};

/// A value found at the end of a path
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch<'a> {
    pub value: &'a Value,
    /// Concrete location, e.g. `subjects[1].name`
    pub location: String,
    /// The mapping that directly contains `value`; `None` when the parent is a sequence
    pub siblings: Option<&'a Map<String, Value>>,
}

impl<'a> PathMatch<'a> {
    /// Value of a sibling field next to the matched value
    pub fn sibling(&self, key: &str) -> Option<&'a Value> {
        self.siblings.and_then(|s| s.get(key))
    }
}

/// Find every value reachable from `content` along `parts`
///
/// Sequences fan out in index order, mappings in key order.
pub fn match_path<'a>(content: &'a Value, parts: &[PathPart]) -> Vec<PathMatch<'a>> {
    let mut matches = Vec::new();
    if !parts.is_empty() {
        descend(content, None, parts, String::new(), &mut matches);
    }
    matches
}

fn descend<'a>(
    node: &'a Value,
    parent: Option<&'a Map<String, Value>>,
    parts: &[PathPart],
    location: String,
    out: &mut Vec<PathMatch<'a>>,
) {
    let Some((part, rest)) = parts.split_first() else {
        out.push(PathMatch {
            value: node,
            location,
            siblings: parent,
        });
        return;
    };

    match (part, node) {
        (PathPart::Key(key), Value::Object(map)) => {
            if let Some(child) = map.get(key) {
                descend(child, Some(map), rest, join_key(&location, key), out);
            }
        }
        (PathPart::AnyOf(keys), Value::Object(map)) => {
            for key in keys {
                if let Some(child) = map.get(key) {
                    descend(child, Some(map), rest, join_key(&location, key), out);
                }
            }
        }
        (PathPart::Wildcard, Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                descend(item, None, rest, format!("{}[{}]", location, index), out);
            }
        }
        (PathPart::Wildcard, Value::Object(map)) => {
            for (key, child) in map {
                descend(child, Some(map), rest, join_key(&location, key), out);
            }
        }
        _ => {
            tracing::trace!("Path segment '{}' not applicable at '{}'", part, location);
        }
    }
}

fn join_key(location: &str, key: &str) -> String {
    if location.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", location, key)
    }
}
