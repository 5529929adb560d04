//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns (file names) of manifests to load while scanning
    #[serde(default = "default_file_includes")]
    pub file_includes: Vec<String>,

    /// Directory or file names skipped while scanning
    #[serde(default = "default_scan_excludes")]
    pub scan_excludes: Vec<String>,

    /// Extra kind handler files loaded on top of the built-in catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handler_files: Vec<PathBuf>,

    /// Resolve references on the rayon pool
    #[serde(default = "default_false")]
    pub parallel: bool,

    /// List references whose target is not in the scanned set
    #[serde(default = "default_true")]
    pub report_unresolved: bool,
}

// Default value functions
fn default_file_includes() -> Vec<String> {
    vec!["*.yaml".to_string(), "*.yml".to_string()]
}

fn default_scan_excludes() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "target".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_includes: default_file_includes(),
            scan_excludes: default_scan_excludes(),
            handler_files: Vec::new(),
            parallel: default_false(),
            report_unresolved: default_true(),
        }
    }
}
