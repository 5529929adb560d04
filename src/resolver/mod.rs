// Reference resolution for kuberef
//
// Turns a resource set and a handler registry into reference edges.

mod core;
mod path;

pub use self::core::{
    Resolution, resolve, resolve_parallel, resolve_parallel_with_report, resolve_resource,
    resolve_with_report, value_matches,
};
pub use path::{PathMatch, match_path};
