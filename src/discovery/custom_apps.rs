//! Apps listed in the configuration file

use super::{AppSource, DiscoveryError, NamespaceScope};
use crate::config::{Config, CustomApp};
use crate::models::{App, DiscoverySource};
use async_trait::async_trait;
use std::sync::Arc;

/// Serves `customApps` from configuration; ignores namespace scope
pub struct ConfigSource {
    config: Arc<Config>,
}

impl ConfigSource {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

fn custom_app_to_app(custom: &CustomApp) -> App {
    let mut app = App::new(
        custom.name.clone(),
        custom.group.clone(),
        custom.url.clone(),
        DiscoverySource::Config,
    )
    .with_icon(custom.icon.clone())
    .with_network_restricted(custom.network_restricted);
    app.properties = custom.properties.clone();
    app
}

#[async_trait]
impl AppSource for ConfigSource {
    fn name(&self) -> &str {
        "config"
    }

    async fn discover(&self, _scope: &NamespaceScope) -> Result<Vec<App>, DiscoveryError> {
        let apps = self
            .config
            .custom_apps
            .iter()
            .filter(|custom| {
                if custom.name.trim().is_empty() {
                    tracing::warn!("Skipping custom app without a name");
                    return false;
                }
                true
            })
            .map(custom_app_to_app)
            .collect();
        Ok(apps)
    }
}
