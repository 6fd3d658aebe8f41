//! Tests for resource conversion and the discovery aggregator
//!
//! Resources are built from JSON manifests, so no cluster is needed.

use async_trait::async_trait;
use forecastle::config::CustomApp;
use forecastle::discovery::{
    ConfigSource, ResourceFilter, annotations, forecastle_app_to_app, http_route_to_app,
    ingress_to_app,
};
use forecastle::models::ForecastleApp;
use forecastle::{App, AppSource, Config, Discovery, DiscoveryError, DiscoverySource, NamespaceScope};
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use kube::api::DynamicObject;
use serde_json::json;
use std::sync::Arc;

fn ingress(annotations: serde_json::Value) -> Ingress {
    serde_json::from_value(json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {
            "name": "grafana-ingress",
            "namespace": "Monitoring",
            "annotations": annotations
        },
        "spec": {
            "tls": [{"hosts": ["grafana.example.com"]}],
            "rules": [{
                "host": "grafana.example.com",
                "http": {"paths": [{"path": "/", "pathType": "Prefix",
                    "backend": {"service": {"name": "grafana", "port": {"number": 3000}}}}]}
            }]
        }
    }))
    .unwrap()
}

#[test]
fn test_ingress_defaults_from_metadata() {
    let ing = ingress(json!({"forecastle.stakater.com/expose": "true"}));
    let app = ingress_to_app(&ing);

    assert_eq!(app.name, "grafana-ingress");
    // Namespace fallback is lowercased
    assert_eq!(app.group, "monitoring");
    assert_eq!(app.url, "https://grafana.example.com/");
    assert_eq!(app.discovery_source, DiscoverySource::Ingress);
    assert!(!app.network_restricted);
    assert!(app.properties.is_empty());
}

#[test]
fn test_ingress_annotations_override() {
    let ing = ingress(json!({
        "forecastle.stakater.com/expose": "true",
        "forecastle.stakater.com/appName": "Grafana",
        "forecastle.stakater.com/group": "Observability",
        "forecastle.stakater.com/icon": "https://grafana.example.com/logo.svg",
        "forecastle.stakater.com/network-restricted": "TRUE",
        "forecastle.stakater.com/url": "https://dashboards.example.com/home",
        "forecastle.stakater.com/properties": "Version:10.2,Docs:https://grafana.com/docs,junk"
    }));
    let app = ingress_to_app(&ing);

    assert_eq!(app.name, "Grafana");
    assert_eq!(app.group, "observability");
    assert_eq!(app.icon, "https://grafana.example.com/logo.svg");
    assert!(app.network_restricted);
    assert_eq!(app.url, "https://dashboards.example.com/home");
    assert_eq!(app.properties.len(), 2);
    assert_eq!(app.properties["Version"], "10.2");
    assert_eq!(app.properties["Docs"], "https://grafana.com/docs");
}

#[test]
fn test_invalid_url_annotation_gives_empty_url() {
    let ing = ingress(json!({
        "forecastle.stakater.com/expose": "true",
        "forecastle.stakater.com/url": "not a url"
    }));
    assert_eq!(ingress_to_app(&ing).url, "");
}

#[test]
fn test_filter_requires_exact_expose() {
    let filter = ResourceFilter::default();

    let exposed = ingress(json!({"forecastle.stakater.com/expose": "true"}));
    let upper = ingress(json!({"forecastle.stakater.com/expose": "True"}));
    let missing = ingress(json!({}));

    assert!(filter.accepts(exposed.annotations()));
    assert!(!filter.accepts(upper.annotations()));
    assert!(!filter.accepts(missing.annotations()));
}

#[test]
fn test_filter_instance_name() {
    let filter = ResourceFilter::new("internal");

    let listed = ingress(json!({
        "forecastle.stakater.com/expose": "true",
        "forecastle.stakater.com/instance": "public, internal"
    }));
    let other = ingress(json!({
        "forecastle.stakater.com/expose": "true",
        "forecastle.stakater.com/instance": "public"
    }));
    let unlisted = ingress(json!({"forecastle.stakater.com/expose": "true"}));

    assert!(filter.accepts(listed.annotations()));
    assert!(!filter.accepts(other.annotations()));
    assert!(!filter.accepts(unlisted.annotations()));

    // Without an instance name the annotation is irrelevant
    assert!(ResourceFilter::default().accepts(other.annotations()));
}

#[test]
fn test_properties_parsing() {
    let props = annotations::parse_properties(" a : 1 ,b:2:3,,:orphan");
    assert_eq!(props.len(), 2);
    assert_eq!(props["a"], "1");
    assert_eq!(props["b"], "2:3");
}

#[test]
fn test_http_route_conversion() {
    let route: DynamicObject = serde_json::from_value(json!({
        "apiVersion": "gateway.networking.k8s.io/v1",
        "kind": "HTTPRoute",
        "metadata": {
            "name": "vault",
            "namespace": "security",
            "annotations": {
                "forecastle.stakater.com/expose": "true",
                "forecastle.stakater.com/properties": "owner:platform"
            }
        },
        "spec": {"hostnames": ["vault.example.com", "vault.internal"]}
    }))
    .unwrap();

    let app = http_route_to_app(&route);
    assert_eq!(app.name, "vault");
    assert_eq!(app.group, "security");
    assert_eq!(app.url, "https://vault.example.com");
    assert_eq!(app.discovery_source, DiscoverySource::HttpRoute);
    assert_eq!(app.properties["owner"], "platform");
}

#[test]
fn test_forecastle_app_conversion() {
    let resource: ForecastleApp = serde_json::from_value(json!({
        "apiVersion": "forecastle.stakater.com/v1alpha1",
        "kind": "ForecastleApp",
        "metadata": {"name": "jenkins", "namespace": "ci"},
        "spec": {
            "name": "Jenkins",
            "group": "CI",
            "icon": "https://jenkins.io/logo.png",
            "url": "https://jenkins.example.com"
        }
    }))
    .unwrap();

    let app = forecastle_app_to_app(&resource);
    assert_eq!(app.name, "Jenkins");
    assert_eq!(app.group, "CI");
    assert_eq!(app.url, "https://jenkins.example.com");
    assert_eq!(app.discovery_source, DiscoverySource::ForecastleAppCrd);
    assert!(!app.network_restricted);
}

/// Fixed result source for aggregator tests
struct StaticSource {
    name: &'static str,
    result: Result<Vec<App>, String>,
}

#[async_trait]
impl AppSource for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn discover(&self, scope: &NamespaceScope) -> Result<Vec<App>, DiscoveryError> {
        assert_eq!(scope, &NamespaceScope::All);
        self.result.clone().map_err(DiscoveryError::Other)
    }
}

fn app(name: &str) -> App {
    App::new(name, "g", "https://example.com", DiscoverySource::Ingress)
}

#[tokio::test]
async fn test_discovery_concatenates_sources() {
    let discovery = Discovery::new(None, Arc::new(Config::default()))
        .with_source(StaticSource {
            name: "first",
            result: Ok(vec![app("a"), app("b")]),
        })
        .with_source(StaticSource {
            name: "second",
            result: Ok(vec![app("c")]),
        });

    assert_eq!(discovery.source_names(), vec!["first", "second"]);
    let names: Vec<String> = discovery
        .discover()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_failing_source_is_skipped() {
    let discovery = Discovery::new(None, Arc::new(Config::default()))
        .with_source(StaticSource {
            name: "broken",
            result: Err("the server could not find the requested resource".to_string()),
        })
        .with_source(StaticSource {
            name: "working",
            result: Ok(vec![app("a")]),
        });

    let apps = discovery.discover().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name, "a");
}

#[tokio::test]
async fn test_without_cluster_only_config_apps() {
    let config = Arc::new(Config {
        custom_apps: vec![CustomApp {
            name: "Status Page".to_string(),
            url: "https://status.example.com".to_string(),
            group: "Ops".to_string(),
            ..Default::default()
        }],
        crd_enabled: true,
        ..Default::default()
    });

    let discovery = Discovery::for_cluster(None, config.clone());
    assert_eq!(discovery.source_names(), vec!["config"]);

    let apps = discovery.discover().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].discovery_source, DiscoverySource::Config);

    // Same result straight from the source
    let direct = ConfigSource::new(config)
        .discover(&NamespaceScope::Only(vec!["ignored".to_string()]))
        .await
        .unwrap();
    assert_eq!(direct, apps);
}
