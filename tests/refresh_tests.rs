//! Tests for the polling refresher
//!
//! Time is paused, so intervals elapse instantly and deterministically.

use async_trait::async_trait;
use forecastle::dashboard::{Action, AppsApi, DisplayConfig, FetchError, Refresher};
use forecastle::{App, DiscoverySource};
use mockall::mock;
use reqwest::StatusCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{Instant, timeout};

mock! {
    pub Api {}

    #[async_trait]
    impl AppsApi for Api {
        async fn fetch_apps(&self) -> Result<Vec<App>, FetchError>;
        async fn fetch_config(&self) -> Result<DisplayConfig, FetchError>;
    }
}

fn app(name: &str) -> App {
    App::new(name, "g", "https://example.com", DiscoverySource::Ingress)
}

fn mock_with_config() -> MockApi {
    let mut api = MockApi::new();
    api.expect_fetch_config()
        .returning(|| Ok(DisplayConfig::default()));
    api
}

/// Slow fake that records how many fetches overlap
struct SlowApi {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl SlowApi {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AppsApi for SlowApi {
    async fn fetch_apps(&self) -> Result<Vec<App>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![app("slow")])
    }

    async fn fetch_config(&self) -> Result<DisplayConfig, FetchError> {
        Ok(DisplayConfig::default())
    }
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_then_background_refresh() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut api = mock_with_config();
    api.expect_fetch_apps().returning(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec![app(&format!("app {}", n))])
    });

    let (mut refresher, mut rx) = Refresher::new(Arc::new(api), Duration::from_secs(30));
    refresher.start();

    assert_eq!(rx.recv().await, Some(Action::LoadStarted));
    assert!(matches!(rx.recv().await, Some(Action::SetConfig(_))));
    assert!(matches!(rx.recv().await, Some(Action::LoadSucceeded { .. })));

    let loaded_at = Instant::now();
    match rx.recv().await {
        Some(Action::RefreshSucceeded { apps, .. }) => assert_eq!(apps[0].name, "app 1"),
        other => panic!("expected refresh, got {:?}", other),
    }
    assert!(loaded_at.elapsed() >= Duration::from_secs(30));

    refresher.stop();
}

#[tokio::test(start_paused = true)]
async fn test_initial_failure_is_classified() {
    let mut api = mock_with_config();
    api.expect_fetch_apps()
        .returning(|| Err(FetchError::from_status(StatusCode::NOT_FOUND, "")));

    let (mut refresher, mut rx) = Refresher::new(Arc::new(api), Duration::from_secs(30));
    refresher.start();

    assert_eq!(rx.recv().await, Some(Action::LoadStarted));
    assert!(matches!(rx.recv().await, Some(Action::SetConfig(_))));
    assert_eq!(
        rx.recv().await,
        Some(Action::LoadFailed("endpoint not found".to_string()))
    );

    refresher.stop();
}

#[tokio::test(start_paused = true)]
async fn test_background_failure_is_silent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut api = mock_with_config();
    api.expect_fetch_apps().returning(move || {
        match counter.fetch_add(1, Ordering::SeqCst) {
            1 => Err(FetchError::from_status(StatusCode::BAD_GATEWAY, "")),
            _ => Ok(vec![app("a")]),
        }
    });

    let (mut refresher, mut rx) = Refresher::new(Arc::new(api), Duration::from_secs(30));
    refresher.start();

    assert_eq!(rx.recv().await, Some(Action::LoadStarted));
    assert!(matches!(rx.recv().await, Some(Action::SetConfig(_))));
    assert!(matches!(rx.recv().await, Some(Action::LoadSucceeded { .. })));

    // The failed tick at 30s emits nothing; the next action is the 60s refresh
    let loaded_at = Instant::now();
    assert!(matches!(rx.recv().await, Some(Action::RefreshSucceeded { .. })));
    assert!(loaded_at.elapsed() >= Duration::from_secs(60));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    refresher.stop();
}

#[tokio::test(start_paused = true)]
async fn test_retry_reruns_initial_load() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut api = mock_with_config();
    api.expect_fetch_apps().returning(move || {
        match counter.fetch_add(1, Ordering::SeqCst) {
            0 => Err(FetchError::NoResponse("connection refused".to_string())),
            _ => Ok(vec![app("a")]),
        }
    });

    let (mut refresher, mut rx) = Refresher::new(Arc::new(api), Duration::from_secs(300));
    refresher.start();

    assert_eq!(rx.recv().await, Some(Action::LoadStarted));
    assert!(matches!(rx.recv().await, Some(Action::SetConfig(_))));
    assert_eq!(
        rx.recv().await,
        Some(Action::LoadFailed("no response from server".to_string()))
    );

    refresher.retry();

    assert_eq!(rx.recv().await, Some(Action::LoadStarted));
    assert!(matches!(rx.recv().await, Some(Action::SetConfig(_))));
    assert!(matches!(rx.recv().await, Some(Action::LoadSucceeded { .. })));

    refresher.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_drops_in_flight_fetch() {
    let api = Arc::new(SlowApi::new(Duration::from_secs(10)));
    let (mut refresher, mut rx) = Refresher::new(api.clone(), Duration::from_secs(30));
    refresher.start();

    assert_eq!(rx.recv().await, Some(Action::LoadStarted));
    assert!(refresher.is_running());
    refresher.stop();
    drop(refresher);

    let next = timeout(Duration::from_secs(60), rx.recv()).await;
    assert!(matches!(next, Ok(None) | Err(_)), "unexpected action: {:?}", next);
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetches_never_overlap() {
    // Each fetch takes longer than the interval
    let api = Arc::new(SlowApi::new(Duration::from_secs(45)));
    let (mut refresher, mut rx) = Refresher::new(api.clone(), Duration::from_secs(30));
    refresher.start();

    let mut refreshes = 0;
    while refreshes < 3 {
        if let Some(Action::RefreshSucceeded { .. }) = rx.recv().await {
            refreshes += 1;
        }
    }
    refresher.stop();

    assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 1);
    // Initial load, three refreshes, and at most one fetch started after the
    // last refresh; missed ticks are not queued up
    assert!(api.calls.load(Ordering::SeqCst) <= 5);
}
