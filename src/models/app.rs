//! Application record
//!
//! The unit of data flowing from discovery, through `/api/apps`, into the
//! dashboard pipeline.

use super::DiscoverySource;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// An application exposed on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub group: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default)]
    pub discovery_source: DiscoverySource,

    #[serde(default, deserialize_with = "null_as_default")]
    pub network_restricted: bool,

    /// Free-form metadata such as version or owner
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: BTreeMap<String, String>,
}

impl App {
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        url: impl Into<String>,
        discovery_source: DiscoverySource,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            url: url.into(),
            discovery_source,
            ..Default::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_network_restricted(mut self, restricted: bool) -> Self {
        self.network_restricted = restricted;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether an icon should be fetched, or a fallback drawn
    pub fn has_icon(&self) -> bool {
        !self.icon.trim().is_empty()
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_record() {
        let app: App = serde_json::from_value(json!({
            "name": "grafana",
            "url": "https://grafana.example.com"
        }))
        .unwrap();

        assert_eq!(app.name, "grafana");
        assert_eq!(app.group, "");
        assert!(!app.network_restricted);
        assert!(app.properties.is_empty());
        assert!(!app.has_icon());
    }

    #[test]
    fn test_deserialize_nulls() {
        let app: App = serde_json::from_value(json!({
            "name": "grafana",
            "url": "https://grafana.example.com",
            "icon": null,
            "group": "monitoring",
            "discoverySource": "Ingress",
            "networkRestricted": null,
            "properties": null
        }))
        .unwrap();

        assert_eq!(app.group, "monitoring");
        assert_eq!(app.discovery_source, DiscoverySource::Ingress);
        assert!(app.properties.is_empty());
    }

    #[test]
    fn test_serialize_camel_case() {
        let app = App::new("vault", "security", "https://vault", DiscoverySource::Config)
            .with_network_restricted(true)
            .with_property("version", "1.15");
        let value = serde_json::to_value(&app).unwrap();

        assert_eq!(value["discoverySource"], "Config");
        assert_eq!(value["networkRestricted"], true);
        assert_eq!(value["properties"]["version"], "1.15");
    }
}
