//! kuberef library
//!
//! Resolves references between parsed Kubernetes resources (RBAC bindings to
//! their roles and subjects, workloads to ConfigMaps and Secrets, Services to
//! Pods, objects to their owners) and exposes them as a queryable graph.

pub mod config;
pub mod graph;
pub mod handlers;
pub mod manifests;
pub mod models;
pub mod report;
pub mod resolver;

// Re-export commonly used types for convenience
pub use graph::ReferenceGraph;
pub use handlers::{HandlerError, HandlerRegistry, KindHandler, default_registry};
pub use models::{RefType, ReferenceEdge, Resource, UnresolvedRef};
pub use resolver::{Resolution, resolve, resolve_parallel, resolve_with_report};
