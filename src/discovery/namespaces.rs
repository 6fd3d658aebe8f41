//! Namespace selection

use super::DiscoveryError;
use crate::config::NamespaceSelector;
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};

/// Namespaces a source should look in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Only(Vec<String>),
}

impl NamespaceScope {
    /// Namespaces to query; `None` means cluster-wide
    pub fn namespaces(&self) -> Option<&[String]> {
        match self {
            NamespaceScope::All => None,
            NamespaceScope::Only(names) => Some(names),
        }
    }

    pub fn contains(&self, namespace: &str) -> bool {
        match self {
            NamespaceScope::All => true,
            NamespaceScope::Only(names) => names.iter().any(|n| n == namespace),
        }
    }
}

/// Turn the configured selector into a concrete scope
///
/// `any` wins, then `matchNames`, then `labelSelector`. An empty selector
/// scans everything.
pub async fn resolve_namespaces(
    client: &Client,
    selector: &NamespaceSelector,
) -> Result<NamespaceScope, DiscoveryError> {
    if selector.any {
        return Ok(NamespaceScope::All);
    }
    if !selector.match_names.is_empty() {
        return Ok(NamespaceScope::Only(selector.match_names.clone()));
    }

    let Some(label_selector) = &selector.label_selector else {
        return Ok(NamespaceScope::All);
    };

    let query = label_selector_string(label_selector)?;
    if query.is_empty() {
        return Ok(NamespaceScope::All);
    }

    let api: Api<Namespace> = Api::all(client.clone());
    let list = api.list(&ListParams::default().labels(&query)).await?;
    let names: Vec<String> = list.items.iter().map(|ns| ns.name_any()).collect();
    tracing::debug!("Label selector {} matched namespaces {:?}", query, names);

    Ok(NamespaceScope::Only(names))
}

/// List a namespaced resource across a scope
pub(crate) async fn list_in_scope<K>(
    client: &Client,
    scope: &NamespaceScope,
) -> Result<Vec<K>, kube::Error>
where
    K: kube::Resource<Scope = kube::core::NamespaceResourceScope>
        + Clone
        + serde::de::DeserializeOwned
        + std::fmt::Debug,
    K::DynamicType: Default,
{
    match scope.namespaces() {
        None => {
            let api: Api<K> = Api::all(client.clone());
            Ok(api.list(&ListParams::default()).await?.items)
        }
        Some(namespaces) => {
            let mut items = Vec::new();
            for ns in namespaces {
                let api: Api<K> = Api::namespaced(client.clone(), ns);
                items.extend(api.list(&ListParams::default()).await?.items);
            }
            Ok(items)
        }
    }
}

/// Render a LabelSelector in the `key=value,key in (a,b)` query syntax
pub fn label_selector_string(selector: &LabelSelector) -> Result<String, DiscoveryError> {
    let mut parts: Vec<String> = selector
        .match_labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    for expr in selector.match_expressions.iter().flatten() {
        let values = expr.values.clone().unwrap_or_default();
        let part = match expr.operator.as_str() {
            "In" => format!("{} in ({})", expr.key, values.join(",")),
            "NotIn" => format!("{} notin ({})", expr.key, values.join(",")),
            "Exists" => expr.key.clone(),
            "DoesNotExist" => format!("!{}", expr.key),
            other => {
                return Err(DiscoveryError::Selector(format!(
                    "unsupported operator '{}' for key '{}'",
                    other, expr.key
                )));
            }
        };
        parts.push(part);
    }

    Ok(parts.join(","))
}
