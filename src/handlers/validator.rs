//! Kind handler validation
//!
//! Checks the structural shape of a handler before it is registered, so a
//! broken catalog entry fails loudly instead of silently matching nothing.

use super::{
    ApiVersionMatcher, HandlerError, HandlerResult, KindHandler, KindPattern, PathPart, RefMapper,
};
use crate::models::RefType;
use std::collections::HashSet;

/// Kind handler validator
pub struct HandlerValidator;

impl HandlerValidator {
    /// Validate a kind handler
    pub fn validate(handler: &KindHandler) -> HandlerResult<()> {
        Self::validate_kind(&handler.kind)?;
        Self::validate_api_version(&handler.kind, &handler.api_version)?;
        for (index, rule) in handler.outgoing_ref_mappers.iter().enumerate() {
            Self::validate_rule(&handler.kind, index, rule)?;
        }
        Ok(())
    }

    fn validate_kind(kind: &str) -> HandlerResult<()> {
        if kind.is_empty() {
            return Err(HandlerError::Invalid(
                "Handler kind cannot be empty".to_string(),
            ));
        }

        if !kind.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(HandlerError::Invalid(format!(
                "Handler kind '{}' contains invalid characters. Kinds are alphanumeric",
                kind
            )));
        }

        Ok(())
    }

    fn validate_api_version(kind: &str, matcher: &ApiVersionMatcher) -> HandlerResult<()> {
        let empty = match matcher {
            ApiVersionMatcher::Exact(version) | ApiVersionMatcher::Group(version) => {
                version.trim().is_empty()
            }
            ApiVersionMatcher::Any => false,
        };
        if empty {
            return Err(HandlerError::Invalid(format!(
                "Handler for '{}' has an empty apiVersion",
                kind
            )));
        }
        Ok(())
    }

    fn validate_rule(kind: &str, index: usize, rule: &RefMapper) -> HandlerResult<()> {
        let parts = &rule.source.path_parts;
        if parts.is_empty() {
            return Err(HandlerError::Invalid(format!(
                "Rule {} of '{}' has an empty path",
                index, kind
            )));
        }

        for part in parts {
            let empty_key = match part {
                PathPart::Key(key) => key.is_empty(),
                PathPart::AnyOf(keys) => keys.is_empty() || keys.iter().any(|k| k.is_empty()),
                PathPart::Wildcard => false,
            };
            if empty_key {
                return Err(HandlerError::Invalid(format!(
                    "Rule {} of '{}' has an empty path segment in '{}'",
                    index,
                    kind,
                    rule.path_display()
                )));
            }
        }

        if let KindPattern::OneOf(kinds) = &rule.target.kind {
            if kinds.is_empty() {
                return Err(HandlerError::Invalid(format!(
                    "Rule {} of '{}' has an empty target kind set",
                    index, kind
                )));
            }
        }

        // A selector is the mapping itself, never one of its values
        if rule.ref_type == RefType::Selector && parts.last() == Some(&PathPart::Wildcard) {
            return Err(HandlerError::Invalid(format!(
                "Selector rule {} of '{}' must end at the selector mapping, not a wildcard",
                index, kind
            )));
        }

        let mut seen_fields = HashSet::new();
        for sibling in &rule.source.sibling_matchers {
            if sibling.field.is_empty() {
                return Err(HandlerError::Invalid(format!(
                    "Rule {} of '{}' has a sibling matcher with an empty field name",
                    index, kind
                )));
            }
            if !seen_fields.insert(&sibling.field) {
                return Err(HandlerError::Invalid(format!(
                    "Duplicate sibling matcher '{}' in rule {} of '{}'",
                    sibling.field, index, kind
                )));
            }
        }

        Ok(())
    }
}
