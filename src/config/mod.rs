//! Configuration system for kuberef
//!
//! A single YAML file layered over built-in defaults, with environment
//! variable overrides on top.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;

/// Keys understood by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "fileIncludes",
    "scanExcludes",
    "handlerFiles",
    "parallel",
    "reportUnresolved",
];

/// Get a configuration value by key
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "fileIncludes" => Ok(config.file_includes.join(",")),
        "scanExcludes" => Ok(config.scan_excludes.join(",")),
        "handlerFiles" => Ok(config
            .handler_files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")),
        "parallel" => Ok(config.parallel.to_string()),
        "reportUnresolved" => Ok(config.report_unresolved.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key
///
/// List values accept a YAML array or a comma-separated list.
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "fileIncludes" => {
            config.file_includes = parse_list(key, value)?;
        }
        "scanExcludes" => {
            config.scan_excludes = parse_list(key, value)?;
        }
        "handlerFiles" => {
            config.handler_files = parse_list(key, value)?
                .into_iter()
                .map(Into::into)
                .collect();
        }
        "parallel" => {
            config.parallel = value
                .parse()
                .context("parallel must be 'true' or 'false'")?;
        }
        "reportUnresolved" => {
            config.report_unresolved = value
                .parse()
                .context("reportUnresolved must be 'true' or 'false'")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

fn parse_list(key: &str, value: &str) -> anyhow::Result<Vec<String>> {
    if value.trim_start().starts_with('[') {
        serde_yaml::from_str(value)
            .map_err(|e| anyhow::anyhow!("{} must be a YAML array of strings: {}", key, e))
    } else {
        Ok(value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_readable() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert!(get_config_value(&config, key).is_ok(), "{}", key);
        }
    }

    #[test]
    fn test_set_list_values() {
        let mut config = Config::default();
        set_config_value(&mut config, "scanExcludes", "vendor, dist").unwrap();
        assert_eq!(config.scan_excludes, vec!["vendor", "dist"]);

        set_config_value(&mut config, "fileIncludes", "['*.yaml', '*.json']").unwrap();
        assert_eq!(get_config_value(&config, "fileIncludes").unwrap(), "*.yaml,*.json");
    }

    #[test]
    fn test_set_bool_rejects_garbage() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "parallel", "yes please").is_err());
        set_config_value(&mut config, "parallel", "true").unwrap();
        assert!(config.parallel);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        assert!(get_config_value(&config, "readOnly").is_err());
        assert!(set_config_value(&mut config, "readOnly", "true").is_err());
    }
}
