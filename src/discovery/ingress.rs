//! Ingress discovery

use super::namespaces::list_in_scope;
use super::{AppSource, DiscoveryError, NamespaceScope, ResourceFilter, annotations};
use crate::models::{App, DiscoverySource};
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Client, ResourceExt};

/// Apps from annotated networking.k8s.io/v1 Ingresses
pub struct IngressSource {
    client: Client,
    filter: ResourceFilter,
}

impl IngressSource {
    pub fn new(client: Client, filter: ResourceFilter) -> Self {
        Self { client, filter }
    }
}

#[async_trait]
impl AppSource for IngressSource {
    fn name(&self) -> &str {
        "ingress"
    }

    async fn discover(&self, scope: &NamespaceScope) -> Result<Vec<App>, DiscoveryError> {
        let ingresses: Vec<Ingress> = list_in_scope(&self.client, scope).await?;
        Ok(ingresses
            .iter()
            .filter(|ingress| self.filter.accepts(ingress.annotations()))
            .map(|ingress| {
                tracing::debug!(
                    "Found ingress {} in namespace {}",
                    ingress.name_any(),
                    ingress.namespace().unwrap_or_default()
                );
                ingress_to_app(ingress)
            })
            .collect())
    }
}

/// Convert an already-filtered Ingress
pub fn ingress_to_app(ingress: &Ingress) -> App {
    let annots = ingress.annotations();

    let name = annotations::value(annots, annotations::APP_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| ingress.name_any());
    let group = annotations::value(annots, annotations::GROUP)
        .map(str::to_string)
        .unwrap_or_else(|| ingress.namespace().unwrap_or_default())
        .to_lowercase();

    let mut app = App::new(name, group, ingress_url(ingress), DiscoverySource::Ingress)
        .with_icon(annotations::value(annots, annotations::ICON).unwrap_or_default())
        .with_network_restricted(annotations::parse_bool(annotations::value(
            annots,
            annotations::NETWORK_RESTRICTED,
        )));
    if let Some(props) = annotations::value(annots, annotations::PROPERTIES) {
        app.properties = annotations::parse_properties(props);
    }
    app
}

/// Absolute URL annotation, or empty when it does not parse
pub(crate) fn url_from_annotation(annots: &std::collections::BTreeMap<String, String>) -> Option<String> {
    let raw = annotations::value(annots, annotations::URL)?;
    match url::Url::parse(raw) {
        Ok(_) => Some(raw.to_string()),
        Err(e) => {
            tracing::warn!("Ignoring invalid url annotation '{}': {}", raw, e);
            Some(String::new())
        }
    }
}

/// URL for an Ingress
///
/// The url annotation wins. Otherwise the first TLS host (https), the first
/// rule host (http) or the load balancer address (http), followed by the
/// first path of the first rule. Empty when no host can be found.
pub fn ingress_url(ingress: &Ingress) -> String {
    if let Some(url) = url_from_annotation(ingress.annotations()) {
        return url;
    }

    let spec = ingress.spec.as_ref();
    let first_rule = spec
        .and_then(|s| s.rules.as_ref())
        .and_then(|rules| rules.first());

    let tls_host = spec
        .and_then(|s| s.tls.as_ref())
        .and_then(|tls| tls.first())
        .and_then(|tls| tls.hosts.as_ref())
        .and_then(|hosts| hosts.first())
        .filter(|host| !host.is_empty());
    let rule_host = first_rule
        .and_then(|rule| rule.host.as_ref())
        .filter(|host| !host.is_empty());
    let status_host = ingress
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .and_then(|lbs| lbs.first())
        .and_then(|lb| {
            lb.hostname
                .as_ref()
                .filter(|h| !h.is_empty())
                .or_else(|| lb.ip.as_ref().filter(|ip| !ip.is_empty()))
        });

    let mut url = if let Some(host) = tls_host {
        format!("https://{}", host)
    } else if let Some(host) = rule_host {
        format!("http://{}", host)
    } else if let Some(host) = status_host {
        format!("http://{}", host)
    } else {
        tracing::warn!("Unable to infer host for ingress {}", ingress.name_any());
        return String::new();
    };

    if let Some(path) = first_rule
        .and_then(|rule| rule.http.as_ref())
        .and_then(|http| http.paths.first())
        .and_then(|p| p.path.as_ref())
    {
        url.push_str(path);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ingress(value: serde_json::Value) -> Ingress {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tls_host_preferred() {
        let ing = ingress(json!({
            "metadata": {"name": "grafana", "namespace": "monitoring"},
            "spec": {
                "tls": [{"hosts": ["grafana.example.com"]}],
                "rules": [{
                    "host": "plain.example.com",
                    "http": {"paths": [{"path": "/ui", "pathType": "Prefix",
                        "backend": {"service": {"name": "grafana", "port": {"number": 80}}}}]}
                }]
            }
        }));
        assert_eq!(ingress_url(&ing), "https://grafana.example.com/ui");
    }

    #[test]
    fn test_load_balancer_fallback() {
        let ing = ingress(json!({
            "metadata": {"name": "x", "namespace": "default"},
            "spec": {},
            "status": {"loadBalancer": {"ingress": [{"ip": "10.0.0.7"}]}}
        }));
        assert_eq!(ingress_url(&ing), "http://10.0.0.7");
    }

    #[test]
    fn test_no_host() {
        let ing = ingress(json!({"metadata": {"name": "x", "namespace": "default"}}));
        assert_eq!(ingress_url(&ing), "");
    }
}
