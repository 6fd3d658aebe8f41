//! ForecastleApp custom resource discovery

use super::ingress::ingress_url;
use super::namespaces::list_in_scope;
use super::{AppSource, DiscoveryError, NamespaceScope, annotations};
use crate::models::{App, DiscoverySource, ForecastleApp};
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Api, Client, ResourceExt};

/// Apps from ForecastleApp resources
pub struct ForecastleAppSource {
    client: Client,
    instance_name: String,
}

impl ForecastleAppSource {
    pub fn new(client: Client, instance_name: String) -> Self {
        Self {
            client,
            instance_name,
        }
    }

    fn accepts(&self, app: &ForecastleApp) -> bool {
        self.instance_name.is_empty()
            || annotations::lists_instance(&app.spec.instance, &self.instance_name)
    }

    /// Borrow the URL of the referenced Ingress
    async fn url_from_ingress_ref(&self, app: &ForecastleApp) -> Option<String> {
        let name = &app.spec.url_from.as_ref()?.ingress_ref.as_ref()?.name;
        let namespace = app.namespace().unwrap_or_default();
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), &namespace);
        match api.get(name).await {
            Ok(ingress) => Some(ingress_url(&ingress)),
            Err(e) => {
                tracing::warn!("Ingress {}/{} not found: {}", namespace, name, e);
                None
            }
        }
    }
}

#[async_trait]
impl AppSource for ForecastleAppSource {
    fn name(&self) -> &str {
        "forecastleapp"
    }

    async fn discover(&self, scope: &NamespaceScope) -> Result<Vec<App>, DiscoveryError> {
        let resources: Vec<ForecastleApp> = list_in_scope(&self.client, scope).await?;

        let mut apps = Vec::new();
        for resource in resources.iter().filter(|r| self.accepts(r)) {
            tracing::debug!(
                "Found ForecastleApp {} in namespace {}",
                resource.name_any(),
                resource.namespace().unwrap_or_default()
            );

            let mut app = forecastle_app_to_app(resource);
            if app.url.is_empty() {
                match self.url_from_ingress_ref(resource).await {
                    Some(url) => app.url = url,
                    None => tracing::warn!("No URL source for ForecastleApp {}", resource.name_any()),
                }
            }
            apps.push(app);
        }
        Ok(apps)
    }
}

/// Convert the spec; the URL stays empty when only `urlFrom` is set
pub fn forecastle_app_to_app(resource: &ForecastleApp) -> App {
    let spec = &resource.spec;
    let mut app = App::new(
        spec.name.clone(),
        spec.group.clone(),
        spec.url.clone(),
        DiscoverySource::ForecastleAppCrd,
    )
    .with_icon(spec.icon.clone())
    .with_network_restricted(spec.network_restricted);
    app.properties = spec.properties.clone();
    app
}
