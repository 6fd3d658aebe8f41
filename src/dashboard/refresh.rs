//! Polling refresher
//!
//! Runs the initial load, then polls the API on a fixed interval and emits
//! [`Action`]s for the store. One spawned task owns the fetcher, so at most
//! one request is ever outstanding: ticks that fire while a fetch is still
//! running are skipped, not queued.

use super::client::AppsApi;
use super::store::Action;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug)]
enum Control {
    Retry,
}

/// Drives initial load and background refresh
pub struct Refresher {
    api: Arc<dyn AppsApi>,
    interval: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    control_tx: Option<mpsc::UnboundedSender<Control>>,
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    /// Create a refresher; actions arrive on the returned receiver
    pub fn new(
        api: Arc<dyn AppsApi>,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                interval,
                action_tx: tx,
                control_tx: None,
                handle: None,
            },
            rx,
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the polling task; no-op when already running
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let api = self.api.clone();
        let action_tx = self.action_tx.clone();
        let interval = self.interval;

        self.control_tx = Some(control_tx);
        self.handle = Some(tokio::spawn(async move {
            poll_loop(api, interval, action_tx, control_rx).await;
        }));
        tracing::debug!("Started refresher with interval {:?}", interval);
    }

    /// Abort polling; an in-flight fetch is dropped and never applied
    pub fn stop(&mut self) {
        self.control_tx = None;
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Stopped refresher");
        }
    }

    /// Re-run the initial load path
    pub fn retry(&self) {
        match &self.control_tx {
            Some(tx) => {
                if tx.send(Control::Retry).is_err() {
                    tracing::debug!("Retry requested but refresher has exited");
                }
            }
            None => tracing::debug!("Retry requested before refresher started"),
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    api: Arc<dyn AppsApi>,
    interval: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    mut control_rx: mpsc::UnboundedReceiver<Control>,
) {
    if !initial_load(api.as_ref(), &action_tx).await {
        return;
    }

    // First background tick comes one full interval after the initial load
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let keep_going = tokio::select! {
            _ = ticker.tick() => background_refresh(api.as_ref(), &action_tx).await,
            control = control_rx.recv() => match control {
                Some(Control::Retry) => {
                    let sent = initial_load(api.as_ref(), &action_tx).await;
                    ticker.reset();
                    sent
                }
                None => false,
            },
        };

        if !keep_going {
            tracing::debug!("Refresher loop exiting");
            return;
        }
    }
}

/// Visible load: loading flag on, then a snapshot or a blocking error
///
/// Returns false once nobody is listening for actions.
async fn initial_load(api: &dyn AppsApi, tx: &mpsc::UnboundedSender<Action>) -> bool {
    if tx.send(Action::LoadStarted).is_err() {
        return false;
    }

    let (config, apps) = tokio::join!(api.fetch_config(), api.fetch_apps());

    match config {
        Ok(config) => {
            if tx.send(Action::SetConfig(config)).is_err() {
                return false;
            }
        }
        Err(e) => tracing::debug!("Failed to fetch config, keeping defaults: {}", e),
    }

    let action = match apps {
        Ok(apps) => {
            tracing::debug!("Loaded {} apps", apps.len());
            Action::LoadSucceeded {
                apps,
                at: Utc::now(),
            }
        }
        Err(e) => {
            tracing::warn!("Failed to load apps: {}", e);
            Action::LoadFailed(e.classify())
        }
    };
    tx.send(action).is_ok()
}

/// Silent refresh: failures keep the previous snapshot and are only logged
async fn background_refresh(api: &dyn AppsApi, tx: &mpsc::UnboundedSender<Action>) -> bool {
    match api.fetch_apps().await {
        Ok(apps) => tx
            .send(Action::RefreshSucceeded {
                apps,
                at: Utc::now(),
            })
            .is_ok(),
        Err(e) => {
            tracing::warn!("Background refresh failed: {}", e.classify());
            !tx.is_closed()
        }
    }
}
