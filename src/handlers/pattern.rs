//! Kind, apiVersion and path segment patterns
//!
//! Catalog entries write patterns as strings (`$.*`, `$(User|Group)`, `**`,
//! `*`). They are parsed once into these enums when a handler is built, so
//! resolution never re-parses them.

use super::{HandlerError, HandlerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which target kinds a reference rule accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KindPattern {
    /// A single kind, e.g. `ConfigMap`
    Exact(String),
    /// Any kind, written `$.*`
    Any,
    /// Any of the listed kinds, written `$(A|B|C)`
    OneOf(Vec<String>),
}

impl KindPattern {
    pub fn exact(kind: impl Into<String>) -> Self {
        KindPattern::Exact(kind.into())
    }

    pub fn one_of(kinds: &[&str]) -> Self {
        KindPattern::OneOf(kinds.iter().map(|k| k.to_string()).collect())
    }

    pub fn parse(s: &str) -> HandlerResult<Self> {
        if s == "$.*" {
            return Ok(KindPattern::Any);
        }
        if let Some(inner) = s.strip_prefix("$(").and_then(|rest| rest.strip_suffix(')')) {
            let kinds: Vec<String> = inner.split('|').map(|k| k.trim().to_string()).collect();
            if kinds.iter().any(|k| k.is_empty()) {
                return Err(HandlerError::InvalidPattern(format!(
                    "Kind set '{}' contains an empty alternative",
                    s
                )));
            }
            return Ok(KindPattern::OneOf(kinds));
        }
        if s.is_empty() || s.starts_with('$') {
            return Err(HandlerError::InvalidPattern(format!(
                "'{}' is not a kind, '$.*' or '$(A|B)'",
                s
            )));
        }
        Ok(KindPattern::Exact(s.to_string()))
    }

    pub fn matches(&self, kind: &str) -> bool {
        match self {
            KindPattern::Exact(expected) => expected == kind,
            KindPattern::Any => true,
            KindPattern::OneOf(kinds) => kinds.iter().any(|k| k == kind),
        }
    }
}

impl fmt::Display for KindPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindPattern::Exact(kind) => write!(f, "{}", kind),
            KindPattern::Any => write!(f, "$.*"),
            KindPattern::OneOf(kinds) => write!(f, "$({})", kinds.join("|")),
        }
    }
}

impl TryFrom<String> for KindPattern {
    type Error = HandlerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        KindPattern::parse(&value)
    }
}

impl From<KindPattern> for String {
    fn from(pattern: KindPattern) -> Self {
        pattern.to_string()
    }
}

/// Which apiVersions a handler applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApiVersionMatcher {
    /// Only this exact apiVersion, e.g. `apps/v1`
    Exact(String),
    /// Any version of one API group, written `group/**`
    Group(String),
    /// Any apiVersion, written `**`
    #[default]
    Any,
}

impl ApiVersionMatcher {
    pub fn exact(api_version: impl Into<String>) -> Self {
        ApiVersionMatcher::Exact(api_version.into())
    }

    pub fn group(group: impl Into<String>) -> Self {
        ApiVersionMatcher::Group(group.into())
    }

    pub fn parse(s: &str) -> HandlerResult<Self> {
        match s {
            "**" => Ok(ApiVersionMatcher::Any),
            "" => Err(HandlerError::InvalidPattern(
                "apiVersion matcher cannot be empty".to_string(),
            )),
            _ => match s.strip_suffix("/**") {
                Some(group) if group.is_empty() || group.contains('*') => {
                    Err(HandlerError::InvalidPattern(format!(
                        "'{}' is not an apiVersion, 'group/**' or '**'",
                        s
                    )))
                }
                Some(group) => Ok(ApiVersionMatcher::Group(group.to_string())),
                None => Ok(ApiVersionMatcher::Exact(s.to_string())),
            },
        }
    }

    pub fn matches(&self, api_version: &str) -> bool {
        match self {
            ApiVersionMatcher::Exact(expected) => expected == api_version,
            ApiVersionMatcher::Group(group) => api_version
                .rsplit_once('/')
                .is_some_and(|(actual, _)| actual == group),
            ApiVersionMatcher::Any => true,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, ApiVersionMatcher::Exact(_))
    }

    /// Lookup precedence, lower wins: exact, then group, then `**`
    pub fn precedence(&self) -> u8 {
        match self {
            ApiVersionMatcher::Exact(_) => 0,
            ApiVersionMatcher::Group(_) => 1,
            ApiVersionMatcher::Any => 2,
        }
    }
}

impl fmt::Display for ApiVersionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersionMatcher::Exact(version) => write!(f, "{}", version),
            ApiVersionMatcher::Group(group) => write!(f, "{}/**", group),
            ApiVersionMatcher::Any => write!(f, "**"),
        }
    }
}

impl TryFrom<String> for ApiVersionMatcher {
    type Error = HandlerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ApiVersionMatcher::parse(&value)
    }
}

impl From<ApiVersionMatcher> for String {
    fn from(matcher: ApiVersionMatcher) -> Self {
        matcher.to_string()
    }
}

/// One segment of a rule's source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPart {
    /// Descend into this mapping key
    Key(String),
    /// Fan out over every sequence element or mapping value, written `*`
    Wildcard,
    /// Descend into each listed key that exists, written `$(a|b)`
    AnyOf(Vec<String>),
}

impl PathPart {
    pub fn parse(s: &str) -> Self {
        if s == "*" {
            return PathPart::Wildcard;
        }
        if let Some(inner) = s.strip_prefix("$(").and_then(|rest| rest.strip_suffix(')')) {
            return PathPart::AnyOf(inner.split('|').map(|k| k.trim().to_string()).collect());
        }
        PathPart::Key(s.to_string())
    }

    /// Parse a whole path such as `["subjects", "*", "name"]`
    pub fn parse_all<S: AsRef<str>>(parts: &[S]) -> Vec<Self> {
        parts.iter().map(|p| PathPart::parse(p.as_ref())).collect()
    }
}

impl fmt::Display for PathPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPart::Key(key) => write!(f, "{}", key),
            PathPart::Wildcard => write!(f, "*"),
            PathPart::AnyOf(keys) => write!(f, "$({})", keys.join("|")),
        }
    }
}
