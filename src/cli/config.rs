//! Configuration subcommands

use anyhow::{Context, Result};
use clap::Subcommand;

use kuberef::config::{self, ConfigLoader, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "parallel", "scanExcludes")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "parallel", "scanExcludes")
        key: String,
        /// Configuration value; lists accept "a,b" or "['a', 'b']"
        value: String,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key: Some(key) } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            let value = config::get_config_value(&config, &key)?;
            println!("{}", value);
        }
        ConfigSubcommand::Get { key: None } | ConfigSubcommand::List => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Set { key, value } => {
            // Start from the file alone so env overrides are not persisted
            let path = paths::root_config_path();
            let mut config = if path.exists() {
                ConfigLoader::load_file(&path)?
            } else {
                ConfigLoader::load_defaults()
            };

            config::set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save_root(&config).context("Failed to save configuration")?;
            println!("Configuration saved");
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
        }
        ConfigSubcommand::Validate => match ConfigLoader::validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                eprintln!("Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
