//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server for discovery.
//!
//! Proxy settings (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`) are honoured by
//! the kube client itself.

use anyhow::{Context, Result};
use kube::{Client, Config};

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to load Kubernetes configuration")?;

    tracing::info!(
        cluster = %config.cluster_url,
        namespace = %config.default_namespace,
        "Connecting to Kubernetes"
    );

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}

/// Create a client, or run without one when no cluster is reachable
///
/// Without a client only configured apps are served.
pub async fn try_create_client() -> Option<Client> {
    match create_client().await {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("Kubernetes unavailable, serving config apps only: {:#}", e);
            None
        }
    }
}
