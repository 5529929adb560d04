//! Reference type definitions
//!
//! The closed set of ways one manifest can point at another. Each variant
//! carries its own rule for comparing a matched value against a candidate
//! target (see `resolver`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of all reference types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    /// Matched string equals the target's `metadata.name`
    Name,
    /// Matched label mapping is a subset of the target's `metadata.labels`
    Selector,
    /// Matched string equals the target's `metadata.uid`
    Owner,
    /// Matched string is a path relative to the source's folder naming the
    /// target's file, or a folder whose kustomization file is the target
    File,
}

impl RefType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefType::Name => "name",
            RefType::Selector => "selector",
            RefType::Owner => "owner",
            RefType::File => "file",
        }
    }

    /// Label for the inverse direction, used when listing incoming edges
    pub fn inverse_label(&self) -> &'static str {
        match self {
            RefType::Name => "referenced by",
            RefType::Selector => "selected by",
            RefType::Owner => "owns",
            RefType::File => "included by",
        }
    }

    pub fn all() -> &'static [Self] {
        &[RefType::Name, RefType::Selector, RefType::Owner, RefType::File]
    }
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RefType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(RefType::Name),
            "selector" => Ok(RefType::Selector),
            "owner" => Ok(RefType::Owner),
            "file" => Ok(RefType::File),
            _ => Err(format!("Unknown reference type: {}", s)),
        }
    }
}
