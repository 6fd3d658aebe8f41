//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{defaults, paths, schema::Config};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Semantic problems found in an otherwise parseable configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("custom app #{index} has no name")]
    CustomAppWithoutName { index: usize },

    #[error("custom app '{name}' has an invalid url '{url}'")]
    CustomAppInvalidUrl { name: String, url: String },

    #[error("namespaceSelector.matchNames contains an empty entry")]
    EmptyNamespaceName,
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Explicit file (`--config`) or the first file found on the search path
    /// 3. Built-in defaults
    ///
    /// An explicit file that is missing or broken is an error. A broken file
    /// found on the search path is also an error, a missing one is not.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut config = Self::load_defaults();

        if let Some(path) = Self::resolve_path(explicit) {
            config = Self::load_file(&path)?;
            tracing::debug!(path = %path.display(), "Loaded configuration file");
        } else if let Some(path) = explicit {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        } else {
            tracing::debug!("No configuration file found, using defaults");
        }

        config = Self::apply_env_overrides(config);

        Ok(config)
    }

    /// Path that `load` would read, if any
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(_) => None,
            None => paths::find_config_file(),
        }
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from YAML text
    ///
    /// An empty document yields the defaults.
    pub fn parse(contents: &str) -> Result<Config> {
        if contents.trim().is_empty() {
            return Ok(Self::load_defaults());
        }
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Validate configuration by loading and checking for errors
    ///
    /// This performs strict validation - it will fail on:
    /// - Invalid YAML syntax
    /// - Invalid value types
    /// - File read errors
    /// - Semantic problems reported by [`ConfigLoader::check`]
    pub fn validate(explicit: Option<&Path>) -> Result<Config> {
        let config = Self::load(explicit).context("Failed to load configuration")?;
        Self::check(&config)?;
        Ok(config)
    }

    /// Check a loaded configuration for semantic problems
    pub fn check(config: &Config) -> std::result::Result<(), ConfigError> {
        if config.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }

        if config
            .namespace_selector
            .match_names
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(ConfigError::EmptyNamespaceName);
        }

        for (index, app) in config.custom_apps.iter().enumerate() {
            if app.name.trim().is_empty() {
                return Err(ConfigError::CustomAppWithoutName { index });
            }
            if url::Url::parse(&app.url).is_err() {
                return Err(ConfigError::CustomAppInvalidUrl {
                    name: app.name.clone(),
                    url: app.url.clone(),
                });
            }
        }

        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        defaults::default_config()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        // FORECASTLE_TITLE override
        if let Ok(title) = std::env::var("FORECASTLE_TITLE") {
            if !title.trim().is_empty() {
                config.title = title;
            }
        }

        // FORECASTLE_INSTANCE_NAME override
        if let Ok(instance) = std::env::var("FORECASTLE_INSTANCE_NAME") {
            config.instance_name = instance;
        }

        config
    }
}
