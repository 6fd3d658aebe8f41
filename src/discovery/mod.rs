//! Application discovery
//!
//! Each [`AppSource`] turns one kind of resource into [`App`] records. The
//! [`Discovery`] aggregator resolves which namespaces to scan, asks every
//! source, and concatenates the results. A source that fails is logged and
//! skipped so one broken API (a missing CRD, say) never empties the dashboard.

pub mod annotations;
mod crd;
mod custom_apps;
mod httproute;
mod ingress;
mod namespaces;

pub use annotations::ResourceFilter;
pub use crd::{ForecastleAppSource, forecastle_app_to_app};
pub use custom_apps::ConfigSource;
pub use httproute::{HttpRouteSource, http_route_to_app, http_route_url};
pub use ingress::{IngressSource, ingress_to_app, ingress_url};
pub use namespaces::{NamespaceScope, label_selector_string, resolve_namespaces};

use crate::config::Config;
use crate::models::App;
use async_trait::async_trait;
use kube::Client;
use std::sync::Arc;
use thiserror::Error;

/// Failure inside a discovery source
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("invalid namespace selector: {0}")]
    Selector(String),

    #[error("{0}")]
    Other(String),
}

/// One way of finding applications
#[async_trait]
pub trait AppSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Discover apps in the given namespaces
    async fn discover(&self, scope: &NamespaceScope) -> Result<Vec<App>, DiscoveryError>;
}

/// Runs every configured source
pub struct Discovery {
    client: Option<Client>,
    config: Arc<Config>,
    sources: Vec<Box<dyn AppSource>>,
}

impl Discovery {
    /// Aggregator with no sources; add them with [`Discovery::with_source`]
    ///
    /// Without a client the namespace scope is always [`NamespaceScope::All`].
    pub fn new(client: Option<Client>, config: Arc<Config>) -> Self {
        Self {
            client,
            config,
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl AppSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Standard set of sources for a cluster
    ///
    /// Config apps are always included. Without a client only those remain.
    pub fn for_cluster(client: Option<Client>, config: Arc<Config>) -> Self {
        let mut discovery =
            Self::new(client.clone(), config.clone()).with_source(ConfigSource::new(config.clone()));

        if let Some(client) = client {
            let filter = ResourceFilter::from_config(&config);
            discovery = discovery
                .with_source(IngressSource::new(client.clone(), filter.clone()))
                .with_source(HttpRouteSource::new(client.clone(), filter));
            if config.crd_enabled {
                discovery = discovery.with_source(ForecastleAppSource::new(
                    client,
                    config.instance_name.trim().to_string(),
                ));
            }
        }

        discovery
    }

    /// Names of the registered sources, in run order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve namespaces and collect apps from every source
    ///
    /// Only a namespace resolution failure is an error; source failures are
    /// logged and skipped.
    pub async fn discover(&self) -> Result<Vec<App>, DiscoveryError> {
        let scope = match &self.client {
            Some(client) => resolve_namespaces(client, &self.config.namespace_selector).await?,
            None => NamespaceScope::All,
        };

        let mut apps = Vec::new();
        for source in &self.sources {
            match source.discover(&scope).await {
                Ok(found) => {
                    tracing::debug!("Source {} found {} apps", source.name(), found.len());
                    apps.extend(found);
                }
                Err(e) => {
                    tracing::warn!("Discovery source {} failed: {}", source.name(), e);
                }
            }
        }

        Ok(apps)
    }
}
