//! HTTP server
//!
//! Serves the cached app list and configuration as JSON, plus liveness and
//! readiness checks. Discovery runs in a background task; requests only read
//! the cache.

pub mod cache;
pub mod handlers;
pub mod middleware;

pub use cache::AppCache;

use crate::config::Config;
use crate::config::defaults::{DEFAULT_CACHE_INTERVAL, DEFAULT_PORT};
use crate::discovery::Discovery;
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{any, get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cache: AppCache,
    pub config: Arc<Config>,
}

/// Runtime options for `serve`
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub port: u16,
    pub cache_interval: Duration,
    /// Prefix for the API routes, e.g. `/forecastle`
    pub base_path: Option<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_interval: DEFAULT_CACHE_INTERVAL,
            base_path: None,
        }
    }
}

/// Normalize a base path to `/segment[/segment]`, or `None` for the root
pub fn normalize_base_path(base_path: Option<&str>) -> Option<String> {
    let trimmed = base_path?.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

/// Build the router with all middleware
///
/// API routes live under the base path; health checks always stay at the root.
/// Layers run outermost first: logging, security headers, CORS, cache control.
pub fn build_router(state: AppState, base_path: Option<&str>) -> Router {
    let api = Router::new()
        .route("/api/apps", get(handlers::apps))
        .route("/api/config", get(handlers::config))
        .route("/api/{*rest}", any(handlers::not_found));

    let health = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz));

    let routes = match normalize_base_path(base_path) {
        Some(prefix) => Router::new().nest(&prefix, api).merge(health),
        None => api.merge(health),
    };

    routes
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::cache_control))
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::log_requests))
}

/// Run the server until SIGINT or SIGTERM
pub async fn run_server(options: ServerOptions, config: Config) -> Result<()> {
    let config = Arc::new(config);
    let client = crate::kube::try_create_client().await;
    let discovery = Discovery::for_cluster(client, config.clone());
    tracing::info!("Discovery sources: {}", discovery.source_names().join(", "));

    let cache = AppCache::new(Arc::new(discovery));
    let refresh_task = cache.spawn_refresh(options.cache_interval);

    let state = AppState { cache, config };
    let router = build_router(state, options.base_path.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], options.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        "Listening on {} (base path: {})",
        addr,
        normalize_base_path(options.base_path.as_deref()).unwrap_or_else(|| "/".to_string())
    );

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    refresh_task.abort();
    tracing::info!("Server stopped");
    result
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Failed to register SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(None), None);
        assert_eq!(normalize_base_path(Some("/")), None);
        assert_eq!(normalize_base_path(Some("")), None);
        assert_eq!(
            normalize_base_path(Some("forecastle/")),
            Some("/forecastle".to_string())
        );
        assert_eq!(
            normalize_base_path(Some("/a/b")),
            Some("/a/b".to_string())
        );
    }
}
