//! Default configuration values
//!
//! Provides default configuration instances and helper functions.

use super::schema::Config;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "KUBEREF_CONFIG_DIR";

/// Environment variable overriding `parallel`
pub const PARALLEL_ENV: &str = "KUBEREF_PARALLEL";

/// Environment variable overriding `reportUnresolved`
pub const REPORT_UNRESOLVED_ENV: &str = "KUBEREF_REPORT_UNRESOLVED";

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}
