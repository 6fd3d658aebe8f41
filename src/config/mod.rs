//! Configuration system for forecastle
//!
//! Built-in defaults, one YAML file and a few environment overrides. The
//! merged `Config` drives discovery and is served to the dashboard as-is.

pub mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{Config, CustomApp, NamespaceSelector};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "title" => Ok(config.title.clone()),
        "headerBackground" => Ok(config.header_background.clone().unwrap_or_default()),
        "headerForeground" => Ok(config.header_foreground.clone().unwrap_or_default()),
        "instanceName" => Ok(config.instance_name.clone()),
        "crdEnabled" => Ok(config.crd_enabled.to_string()),
        "namespaceSelector.any" => Ok(config.namespace_selector.any.to_string()),
        "namespaceSelector.matchNames" => {
            // Return as YAML array
            serde_yaml::to_string(&config.namespace_selector.match_names).map_err(|e| {
                anyhow::anyhow!("Failed to serialize namespaceSelector.matchNames: {}", e)
            })
        }
        "namespaceSelector.labelSelector" => {
            serde_yaml::to_string(&config.namespace_selector.label_selector).map_err(|e| {
                anyhow::anyhow!("Failed to serialize namespaceSelector.labelSelector: {}", e)
            })
        }
        "customApps" => serde_yaml::to_string(&config.custom_apps)
            .map_err(|e| anyhow::anyhow!("Failed to serialize customApps: {}", e)),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_value() {
        let mut config = Config::default();
        config.instance_name = "edge".to_string();
        config.namespace_selector.match_names = vec!["tools".to_string()];

        assert_eq!(get_config_value(&config, "title").unwrap(), "Forecastle");
        assert_eq!(get_config_value(&config, "instanceName").unwrap(), "edge");
        assert_eq!(get_config_value(&config, "crdEnabled").unwrap(), "false");
        assert!(
            get_config_value(&config, "namespaceSelector.matchNames")
                .unwrap()
                .contains("tools")
        );
        assert!(get_config_value(&config, "nope").is_err());
    }
}
