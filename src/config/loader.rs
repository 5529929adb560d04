//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::defaults::{self, PARALLEL_ENV, REPORT_UNRESOLVED_ENV};
use super::{paths, schema::Config};
use crate::handlers::HandlerLoader;
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config
    /// 3. Built-in defaults
    pub fn load() -> Result<Config> {
        Self::load_from(&paths::root_config_path())
    }

    /// Same as [`ConfigLoader::load`] with an explicit root config file
    pub fn load_from(path: &Path) -> Result<Config> {
        let mut config = Self::load_defaults();

        if path.exists() {
            let root_config = Self::load_file(path)?;
            config = Self::merge_config(config, root_config);
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
        }

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration by loading and checking for errors
    ///
    /// Fails on invalid YAML, invalid value types, malformed include globs
    /// and handler files that cannot be loaded.
    pub fn validate() -> Result<()> {
        Self::validate_file(&paths::root_config_path())
    }

    pub fn validate_file(path: &Path) -> Result<()> {
        let config = Self::load_from(path).context("Failed to load merged configuration")?;

        for pattern in &config.file_includes {
            globset::Glob::new(pattern)
                .with_context(|| format!("fileIncludes has an invalid pattern: {}", pattern))?;
        }

        HandlerLoader::load_files(&config.handler_files)
            .context("handlerFiles contains an invalid handler file")?;

        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Merge two configurations, with `other` taking precedence
    fn merge_config(_base: Config, other: Config) -> Config {
        Config {
            file_includes: other.file_includes,
            scan_excludes: other.scan_excludes,
            handler_files: other.handler_files,
            parallel: other.parallel,
            report_unresolved: other.report_unresolved,
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(parallel) = std::env::var(PARALLEL_ENV) {
            match parallel.parse::<bool>() {
                Ok(val) => config.parallel = val,
                Err(_) => tracing::warn!("Ignoring {}={}: not a boolean", PARALLEL_ENV, parallel),
            }
        }

        if let Ok(report) = std::env::var(REPORT_UNRESOLVED_ENV) {
            match report.parse::<bool>() {
                Ok(val) => config.report_unresolved = val,
                Err(_) => tracing::warn!(
                    "Ignoring {}={}: not a boolean",
                    REPORT_UNRESOLVED_ENV,
                    report
                ),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}
