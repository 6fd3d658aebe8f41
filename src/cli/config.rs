//! Configuration subcommands

use crate::config::{ConfigLoader, paths};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value, or the whole merged configuration
    Get {
        /// Configuration key (e.g., "title", "namespaceSelector.matchNames")
        key: Option<String>,
    },
    /// Show which configuration file is used
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load(explicit).context("Failed to load configuration")?;

            if let Some(key) = key {
                let value = crate::config::get_config_value(&config, &key)?;
                println!("{}", value.trim_end());
            } else {
                // Print all config as YAML
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Path => match ConfigLoader::resolve_path(explicit) {
            Some(path) => println!("{}", path.display()),
            None => {
                println!("No configuration file found. Searched:");
                for candidate in paths::config_search_paths() {
                    println!("  - {}", candidate.display());
                }
            }
        },
        ConfigSubcommand::Validate => {
            ConfigLoader::validate(explicit).context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
