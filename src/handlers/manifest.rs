//! Handler file schema and loader
//!
//! Custom kind handlers are contributed as YAML files holding a list of
//! handlers. Sibling matchers are referenced by name (see
//! [`matchers::names`](super::matchers::names)); patterns are parsed while
//! deserializing, so a malformed file is rejected before anything is
//! registered.
//!
//! ```yaml
//! - kind: Kustomization
//!   apiVersion: "**"
//!   outgoingRefMappers:
//!     - source:
//!         pathParts: [spec, sourceRef, name]
//!         siblingMatchers: {kind: targetKind}
//!       target: {kind: "$(GitRepository|OCIRepository)"}
//!       type: name
//! ```

use super::validator::HandlerValidator;
use super::{
    ApiVersionMatcher, HandlerError, HandlerResult, KindHandler, KindPattern, PathPart, RefMapper,
    matchers,
};
use crate::models::RefType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One handler as written in a handler file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HandlerManifest {
    pub kind: String,

    /// `**` when omitted
    #[serde(default)]
    pub api_version: ApiVersionMatcher,

    #[serde(default)]
    pub outgoing_ref_mappers: Vec<RefMapperManifest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefMapperManifest {
    pub source: RefSourceManifest,
    pub target: RefTargetManifest,
    #[serde(rename = "type")]
    pub ref_type: RefType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RefSourceManifest {
    pub path_parts: Vec<String>,

    /// Sibling field name to matcher name
    #[serde(default)]
    pub sibling_matchers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefTargetManifest {
    pub kind: KindPattern,
}

impl HandlerManifest {
    /// Resolve matcher names and build a validated handler
    pub fn into_handler(self) -> HandlerResult<KindHandler> {
        let mut handler = KindHandler::new(self.kind, self.api_version);
        handler.help_link = self.help_link;

        for rule in self.outgoing_ref_mappers {
            let mut mapper = RefMapper::from_parts(
                PathPart::parse_all(&rule.source.path_parts),
                rule.target.kind,
                rule.ref_type,
            );
            for (field, matcher_name) in &rule.source.sibling_matchers {
                let matcher = matchers::named(matcher_name)
                    .ok_or_else(|| HandlerError::UnknownMatcher(matcher_name.clone()))?;
                mapper = mapper.with_shared_sibling(field, matcher);
            }
            handler = handler.with_rule(mapper);
        }

        HandlerValidator::validate(&handler)?;
        Ok(handler)
    }
}

/// Loads kind handlers from YAML handler files
pub struct HandlerLoader;

impl HandlerLoader {
    /// Parse handler definitions from YAML text
    pub fn load_str(content: &str) -> HandlerResult<Vec<KindHandler>> {
        let manifests: Vec<HandlerManifest> = serde_yaml::from_str(content)
            .map_err(|e| HandlerError::Invalid(format!("Malformed handler definitions: {}", e)))?;

        manifests
            .into_iter()
            .map(HandlerManifest::into_handler)
            .collect()
    }

    /// Load every handler defined in a file
    pub fn load_file(path: &Path) -> HandlerResult<Vec<KindHandler>> {
        tracing::debug!("Loading kind handlers from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| HandlerError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let handlers = Self::load_str(&content).map_err(|e| HandlerError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!("Loaded {} kind handler(s) from {:?}", handlers.len(), path);
        Ok(handlers)
    }

    /// Load several files, failing on the first broken one
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> HandlerResult<Vec<KindHandler>> {
        let mut handlers = Vec::new();
        for path in paths {
            handlers.extend(Self::load_file(path.as_ref())?);
        }
        Ok(handlers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUSTOMIZATION_HANDLER: &str = r#"
- kind: Kustomization
  apiVersion: "**"
  helpLink: https://fluxcd.io/flux/components/kustomize/kustomizations/
  outgoingRefMappers:
    - source:
        pathParts: [spec, sourceRef, name]
        siblingMatchers:
          kind: targetKind
          namespace: targetNamespace
      target:
        kind: "$(GitRepository|OCIRepository|Bucket)"
      type: name
"#;

    #[test]
    fn test_load_str() {
        let handlers = HandlerLoader::load_str(KUSTOMIZATION_HANDLER).unwrap();
        assert_eq!(handlers.len(), 1);

        let handler = &handlers[0];
        assert_eq!(handler.kind, "Kustomization");
        assert_eq!(handler.api_version, ApiVersionMatcher::Any);
        assert!(handler.help_link.is_some());

        let rule = &handler.outgoing_ref_mappers[0];
        assert_eq!(rule.path_display(), "spec.sourceRef.name");
        assert_eq!(rule.ref_type, RefType::Name);
        assert!(rule.target.kind.matches("OCIRepository"));
        assert_eq!(rule.source.sibling_matchers.len(), 2);
    }

    #[test]
    fn test_api_version_defaults_to_any() {
        let yaml = r#"
- kind: Foo
  outgoingRefMappers: []
"#;
        let handlers = HandlerLoader::load_str(yaml).unwrap();
        assert_eq!(handlers[0].api_version, ApiVersionMatcher::Any);
    }

    #[test]
    fn test_unknown_matcher_rejected() {
        let yaml = r#"
- kind: Foo
  outgoingRefMappers:
    - source:
        pathParts: [spec, ref]
        siblingMatchers: {kind: noSuchMatcher}
      target: {kind: Bar}
      type: name
"#;
        assert!(matches!(
            HandlerLoader::load_str(yaml),
            Err(HandlerError::UnknownMatcher(name)) if name == "noSuchMatcher"
        ));
    }

    #[test]
    fn test_bad_kind_pattern_rejected() {
        let yaml = r#"
- kind: Foo
  outgoingRefMappers:
    - source: {pathParts: [spec, ref]}
      target: {kind: "$(|)"}
      type: name
"#;
        assert!(HandlerLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
- kind: Foo
  outgoingRefMapper: []
"#;
        assert!(HandlerLoader::load_str(yaml).is_err());
    }

    #[test]
    fn test_empty_path_rejected() {
        let yaml = r#"
- kind: Foo
  outgoingRefMappers:
    - source: {pathParts: []}
      target: {kind: Bar}
      type: name
"#;
        assert!(matches!(
            HandlerLoader::load_str(yaml),
            Err(HandlerError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_file_missing() {
        let result = HandlerLoader::load_file(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(HandlerError::LoadError { .. })));
    }

    #[test]
    fn test_load_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kustomize.yaml");
        std::fs::write(&path, KUSTOMIZATION_HANDLER).unwrap();

        let handlers = HandlerLoader::load_files(&[&path]).unwrap();
        assert_eq!(handlers.len(), 1);
    }
}
