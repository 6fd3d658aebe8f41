//! ForecastleApp custom resource
//!
//! Lets teams register a dashboard entry explicitly instead of annotating an
//! Ingress. The URL either comes from `spec.url` or is borrowed from an
//! Ingress in the same namespace.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "forecastle.stakater.com",
    version = "v1alpha1",
    kind = "ForecastleApp",
    plural = "forecastleapps",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ForecastleAppSpec {
    pub name: String,

    /// Comma-separated list of dashboard instances that should show this app
    #[serde(default)]
    pub instance: String,

    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_from: Option<UrlSource>,

    #[serde(default)]
    pub network_restricted: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// Where to look up the URL when `spec.url` is empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_ref: Option<LocalObjectReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    pub name: String,
}
