//! Gateway API HTTPRoute discovery
//!
//! HTTPRoutes are read as dynamic objects so no Gateway API types are
//! compiled in. Clusters without the CRD simply yield no apps.

use super::ingress::url_from_annotation;
use super::{AppSource, DiscoveryError, NamespaceScope, ResourceFilter, annotations};
use crate::models::{App, DiscoverySource};
use async_trait::async_trait;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::{Api, Client, ResourceExt};

/// Apps from annotated gateway.networking.k8s.io/v1 HTTPRoutes
pub struct HttpRouteSource {
    client: Client,
    filter: ResourceFilter,
    resource: ApiResource,
}

impl HttpRouteSource {
    pub fn new(client: Client, filter: ResourceFilter) -> Self {
        let gvk = GroupVersionKind::gvk("gateway.networking.k8s.io", "v1", "HTTPRoute");
        Self {
            client,
            filter,
            resource: ApiResource::from_gvk_with_plural(&gvk, "httproutes"),
        }
    }

    async fn list(&self, scope: &NamespaceScope) -> Result<Vec<DynamicObject>, kube::Error> {
        match scope.namespaces() {
            None => {
                let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &self.resource);
                Ok(api.list(&ListParams::default()).await?.items)
            }
            Some(namespaces) => {
                let mut items = Vec::new();
                for ns in namespaces {
                    let api: Api<DynamicObject> =
                        Api::namespaced_with(self.client.clone(), ns, &self.resource);
                    items.extend(api.list(&ListParams::default()).await?.items);
                }
                Ok(items)
            }
        }
    }
}

#[async_trait]
impl AppSource for HttpRouteSource {
    fn name(&self) -> &str {
        "httproute"
    }

    async fn discover(&self, scope: &NamespaceScope) -> Result<Vec<App>, DiscoveryError> {
        let routes = match self.list(scope).await {
            Ok(routes) => routes,
            Err(kube::Error::Api(resp)) if resp.code == 404 => {
                tracing::debug!("HTTPRoute API not installed, skipping");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(routes
            .iter()
            .filter(|route| self.filter.accepts(route.annotations()))
            .map(|route| {
                tracing::debug!(
                    "Found HTTPRoute {} in namespace {}",
                    route.name_any(),
                    route.namespace().unwrap_or_default()
                );
                http_route_to_app(route)
            })
            .collect())
    }
}

/// Convert an already-filtered HTTPRoute
pub fn http_route_to_app(route: &DynamicObject) -> App {
    let annots = route.annotations();

    let name = annotations::value(annots, annotations::APP_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| route.name_any());
    let group = annotations::value(annots, annotations::GROUP)
        .map(str::to_string)
        .unwrap_or_else(|| route.namespace().unwrap_or_default())
        .to_lowercase();

    let mut app = App::new(name, group, http_route_url(route), DiscoverySource::HttpRoute)
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

/// URL annotation, else `https://` plus the first hostname
pub fn http_route_url(route: &DynamicObject) -> String {
    if let Some(url) = url_from_annotation(route.annotations()) {
        return url;
    }

    match route
        .data
        .pointer("/spec/hostnames/0")
        .and_then(|h| h.as_str())
        .filter(|h| !h.is_empty())
    {
        Some(host) => format!("https://{}", host),
        None => {
            tracing::warn!("No hostnames defined for HTTPRoute {}", route.name_any());
            String::new()
        }
    }
}
