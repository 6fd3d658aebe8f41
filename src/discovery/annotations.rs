//! Forecastle annotations and resource filters

use crate::config::Config;
use std::collections::BTreeMap;

pub const EXPOSE: &str = "forecastle.stakater.com/expose";
pub const ICON: &str = "forecastle.stakater.com/icon";
pub const APP_NAME: &str = "forecastle.stakater.com/appName";
pub const GROUP: &str = "forecastle.stakater.com/group";
pub const INSTANCE: &str = "forecastle.stakater.com/instance";
pub const NETWORK_RESTRICTED: &str = "forecastle.stakater.com/network-restricted";
pub const URL: &str = "forecastle.stakater.com/url";
pub const PROPERTIES: &str = "forecastle.stakater.com/properties";

/// Non-empty annotation value
pub fn value<'a>(annotations: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Parse a boolean annotation; anything but "true" (any case) is false
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Parse `key:value,key2:value2`
///
/// Only the first `:` splits, so values may contain colons (URLs).
/// Entries without a `:` are ignored.
pub fn parse_properties(value: &str) -> BTreeMap<String, String> {
    value
        .split(',')
        .filter_map(|entry| entry.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Whether a comma-separated instance list names `instance`
pub fn lists_instance(instances: &str, instance: &str) -> bool {
    instances.split(',').any(|entry| entry.trim() == instance)
}

/// Annotation-based selection shared by Ingress and HTTPRoute discovery
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    instance_name: String,
}

impl ResourceFilter {
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.instance_name.trim())
    }

    /// Expose must be exactly "true"; a configured instance must be listed
    pub fn accepts(&self, annotations: &BTreeMap<String, String>) -> bool {
        if annotations.get(EXPOSE).map(String::as_str) != Some("true") {
            return false;
        }
        self.accepts_instance(annotations.get(INSTANCE).map(String::as_str))
    }

    /// Instance check alone, for resources that carry it outside annotations
    pub fn accepts_instance(&self, instances: Option<&str>) -> bool {
        if self.instance_name.is_empty() {
            return true;
        }
        instances.is_some_and(|list| lists_instance(list, &self.instance_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_properties() {
        let props = parse_properties("version:1.2,docs:https://docs.example.com,broken");
        assert_eq!(props.len(), 2);
        assert_eq!(props["version"], "1.2");
        assert_eq!(props["docs"], "https://docs.example.com");
    }

    #[test]
    fn test_expose_must_be_true() {
        let filter = ResourceFilter::default();
        assert!(filter.accepts(&annotations(&[(EXPOSE, "true")])));
        assert!(!filter.accepts(&annotations(&[(EXPOSE, "True")])));
        assert!(!filter.accepts(&annotations(&[(EXPOSE, "yes")])));
        assert!(!filter.accepts(&annotations(&[])));
    }

    #[test]
    fn test_instance_filter() {
        let filter = ResourceFilter::new("internal");
        assert!(filter.accepts(&annotations(&[(EXPOSE, "true"), (INSTANCE, "public, internal")])));
        assert!(!filter.accepts(&annotations(&[(EXPOSE, "true"), (INSTANCE, "internal-2")])));
        assert!(!filter.accepts(&annotations(&[(EXPOSE, "true")])));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(Some("true")));
        assert!(parse_bool(Some("TRUE")));
        assert!(!parse_bool(Some("1")));
        assert!(!parse_bool(None));
    }
}
