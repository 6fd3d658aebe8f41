//! Discovery source definitions
//!
//! Every application carries a tag naming how it was found. Known tags map to
//! dedicated variants; anything else is kept verbatim so a newer backend never
//! breaks an older client.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// How an application entry was discovered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiscoverySource {
    /// Annotated Kubernetes Ingress
    Ingress,
    /// Statically listed in the configuration file
    Config,
    /// ForecastleApp custom resource
    ForecastleAppCrd,
    /// Gateway API HTTPRoute
    HttpRoute,
    /// Unrecognized tag, preserved as received
    Other(String),
}

impl DiscoverySource {
    /// Get the wire name as a string
    pub fn as_str(&self) -> &str {
        match self {
            DiscoverySource::Ingress => "Ingress",
            DiscoverySource::Config => "Config",
            DiscoverySource::ForecastleAppCrd => "ForecastleAppCRD",
            DiscoverySource::HttpRoute => "HTTPRoute",
            DiscoverySource::Other(raw) => raw,
        }
    }

    /// Short label used when rendering a badge
    ///
    /// Unrecognized tags fall back to their raw value, or "Unknown" when empty.
    pub fn label(&self) -> &str {
        match self {
            DiscoverySource::ForecastleAppCrd => "CRD",
            DiscoverySource::Other(raw) if raw.is_empty() => "Unknown",
            other => other.as_str(),
        }
    }

    /// Whether this tag is one of the known discovery mechanisms
    pub fn is_known(&self) -> bool {
        !matches!(self, DiscoverySource::Other(_))
    }

    /// Get all known discovery sources
    pub fn all() -> &'static [Self] {
        &[
            DiscoverySource::Ingress,
            DiscoverySource::Config,
            DiscoverySource::ForecastleAppCrd,
            DiscoverySource::HttpRoute,
        ]
    }
}

impl Default for DiscoverySource {
    fn default() -> Self {
        DiscoverySource::Other(String::new())
    }
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DiscoverySource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Ingress" => DiscoverySource::Ingress,
            "Config" => DiscoverySource::Config,
            "ForecastleAppCRD" => DiscoverySource::ForecastleAppCrd,
            "HTTPRoute" => DiscoverySource::HttpRoute,
            other => DiscoverySource::Other(other.to_string()),
        })
    }
}

impl Serialize for DiscoverySource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DiscoverySource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.parse().unwrap_or_default())
    }
}
