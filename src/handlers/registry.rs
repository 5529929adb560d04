//! Kind handler registry
//!
//! Holds at most one handler per `(kind, apiVersion matcher)` key and picks
//! the best handler for a resource.

use super::catalog;
use super::validator::HandlerValidator;
use super::{ApiVersionMatcher, HandlerError, HandlerResult, KindHandler};
use std::sync::LazyLock;

static DEFAULT_REGISTRY: LazyLock<HandlerResult<HandlerRegistry>> =
    LazyLock::new(HandlerRegistry::builtin);

/// Process-wide registry holding the built-in catalog
///
/// Built on first use. Fails if a catalog entry does not validate. Prefer
/// constructing and passing a [`HandlerRegistry`] explicitly when custom
/// handlers are involved.
pub fn default_registry() -> Result<&'static HandlerRegistry, &'static HandlerError> {
    DEFAULT_REGISTRY.as_ref()
}

/// Registry of kind handlers, in registration order
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: Vec<KindHandler>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Create a registry holding the built-in catalog
    pub fn builtin() -> HandlerResult<Self> {
        Self::from_handlers(catalog::builtin_handlers())
    }

    /// Create a registry from a list of handlers, failing on the first invalid one
    pub fn from_handlers(handlers: Vec<KindHandler>) -> HandlerResult<Self> {
        let mut registry = Self::new();
        for handler in handlers {
            registry.register(handler)?;
        }
        Ok(registry)
    }

    /// Register a handler, replacing any handler with the same key
    pub fn register(&mut self, handler: KindHandler) -> HandlerResult<()> {
        HandlerValidator::validate(&handler)?;

        if let Some(existing) = self.handlers.iter_mut().find(|h| h.same_key(&handler)) {
            tracing::debug!(
                "Replacing kind handler for {} ({})",
                handler.kind,
                handler.api_version
            );
            *existing = handler;
        } else {
            tracing::debug!(
                "Registered kind handler for {} ({}) with {} rules",
                handler.kind,
                handler.api_version,
                handler.outgoing_ref_mappers.len()
            );
            self.handlers.push(handler);
        }
        Ok(())
    }

    /// Register a handler, rejecting it if its key is already taken
    pub fn register_new(&mut self, handler: KindHandler) -> HandlerResult<()> {
        if self.handlers.iter().any(|h| h.same_key(&handler)) {
            return Err(HandlerError::Duplicate {
                kind: handler.kind,
                api_version: handler.api_version.to_string(),
            });
        }
        self.register(handler)
    }

    /// Find the handler for a resource
    ///
    /// An exact apiVersion match beats a `group/**` match, which beats `**`.
    /// Kinds without a handler simply have no outgoing references.
    pub fn lookup(&self, kind: &str, api_version: &str) -> Option<&KindHandler> {
        self.handlers
            .iter()
            .filter(|h| h.kind == kind && h.api_version.matches(api_version))
            .min_by_key(|h| h.api_version.precedence())
    }

    /// Remove the handler registered under exactly this key
    pub fn remove(
        &mut self,
        kind: &str,
        api_version: &ApiVersionMatcher,
    ) -> HandlerResult<KindHandler> {
        let position = self
            .handlers
            .iter()
            .position(|h| h.kind == kind && &h.api_version == api_version)
            .ok_or_else(|| {
                HandlerError::Invalid(format!(
                    "No handler registered for {} ({})",
                    kind, api_version
                ))
            })?;
        Ok(self.handlers.remove(position))
    }

    /// Get all handlers in registration order
    pub fn handlers(&self) -> &[KindHandler] {
        &self.handlers
    }

    /// Check if any handler is registered for a kind
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.handlers.iter().any(|h| h.kind == kind)
    }

    /// Get the number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
