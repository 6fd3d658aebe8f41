//! Cached application list
//!
//! Discovery is too slow to run per request, so the server answers from the
//! last successful run and refreshes in the background.

use crate::discovery::Discovery;
use crate::models::App;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Default)]
struct CacheState {
    apps: Arc<Vec<App>>,
    cached_at: Option<DateTime<Utc>>,
}

/// Thread-safe cache of the last discovery result
///
/// Guards are never held across an await point.
#[derive(Clone)]
pub struct AppCache {
    discovery: Arc<Discovery>,
    state: Arc<RwLock<CacheState>>,
}

impl AppCache {
    pub fn new(discovery: Arc<Discovery>) -> Self {
        Self {
            discovery,
            state: Arc::new(RwLock::new(CacheState::default())),
        }
    }

    /// Run discovery once and store the result
    ///
    /// On failure the previous list is kept and the error is returned.
    pub async fn refresh(&self) -> anyhow::Result<usize> {
        let apps = self.discovery.discover().await?;
        let count = apps.len();

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.apps = Arc::new(apps);
        state.cached_at = Some(Utc::now());
        Ok(count)
    }

    /// Snapshot of the cached apps
    pub fn apps(&self) -> Arc<Vec<App>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .apps
            .clone()
    }

    /// When the last successful refresh finished
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .cached_at
    }

    /// Whether at least one refresh has succeeded
    pub fn is_ready(&self) -> bool {
        self.cached_at().is_some()
    }

    /// Refresh now, then every `interval`, until the task is aborted
    pub fn spawn_refresh(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // The first tick completes immediately
                ticker.tick().await;
                match cache.refresh().await {
                    Ok(count) => tracing::debug!("Cache refreshed with {} apps", count),
                    Err(e) => tracing::warn!("Cache refresh failed, keeping previous apps: {:#}", e),
                }
            }
        })
    }
}
