//! Resource model layer
//!
//! Structure:
//! - `resource.rs` - parsed manifest documents and their identity
//! - `ref_type.rs` - closed set of reference types
//! - `edge.rs` - resolved edges and unresolved reference reports

mod edge;
mod ref_type;
mod resource;

pub use edge::{ReferenceEdge, UnresolvedRef};
pub use ref_type::RefType;
pub use resource::{KUSTOMIZATION_KIND, Resource};
