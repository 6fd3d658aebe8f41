//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde for
//! serialization. The same structure is served verbatim by `/api/config`.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Which namespaces are scanned for annotated resources
    #[serde(default)]
    pub namespace_selector: NamespaceSelector,

    /// Page title shown in the header
    #[serde(default = "default_title")]
    pub title: String,

    /// Header background color (any CSS color)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_background: Option<String>,

    /// Header foreground color (any CSS color)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_foreground: Option<String>,

    /// Name of this dashboard instance; resources must opt in when set
    #[serde(default)]
    pub instance_name: String,

    /// Apps that are not backed by any cluster resource
    #[serde(default)]
    pub custom_apps: Vec<CustomApp>,

    /// Discover ForecastleApp custom resources
    #[serde(default = "default_false")]
    pub crd_enabled: bool,
}

/// Namespace selection for discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSelector {
    /// Scan every namespace
    #[serde(default = "default_false")]
    pub any: bool,

    /// Scan exactly these namespaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_names: Vec<String>,

    /// Scan namespaces whose labels match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<LabelSelector>,
}

/// App listed statically in configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomApp {
    pub name: String,

    #[serde(default)]
    pub icon: String,

    pub url: String,

    #[serde(default)]
    pub group: String,

    #[serde(default = "default_false")]
    pub network_restricted: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

// Default value functions
fn default_title() -> String {
    "Forecastle".to_string()
}

fn default_false() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace_selector: NamespaceSelector::default(),
            title: default_title(),
            header_background: None,
            header_foreground: None,
            instance_name: String::new(),
            custom_apps: Vec::new(),
            crd_enabled: default_false(),
        }
    }
}
