//! `dashboard` command
//!
//! Fetches the app list from a running server and prints it. With `--watch`
//! it keeps polling and redraws on every change, reading one-letter commands
//! from stdin.

use super::parse_duration;
use crate::config::defaults::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_URL};
use crate::dashboard::{
    Action, AppsApi, DashboardState, HttpApiClient, PreferenceStore, Refresher, Store, ThemeMode,
    ViewMode, ViewStatus, derive_view, render,
};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

const WATCH_HELP: &str = "Commands: r retry | t theme | v view | /text search | / clear | q quit";

/// Options for the dashboard client
#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Server URL, including any base path
    #[arg(long, env = "FORECASTLE_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,

    /// Only show apps whose name or group contains this text
    #[arg(long, short = 'q', default_value = "")]
    pub query: String,

    /// Layout (saved as the new default)
    #[arg(long, value_enum)]
    pub view: Option<ViewMode>,

    /// Theme (saved as the new default)
    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Keep polling and redraw on change
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Poll interval in watch mode (e.g. "30s")
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    pub interval: Duration,
}

/// One line typed in watch mode
#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Retry,
    Quit,
    Dispatch(Action),
}

/// Parse a watch-mode command line
pub fn parse_watch_command(line: &str) -> Option<WatchCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(query) = line.strip_prefix('/') {
        return Some(WatchCommand::Dispatch(Action::SetQuery(query.to_string())));
    }
    match line.trim() {
        "r" => Some(WatchCommand::Retry),
        "q" => Some(WatchCommand::Quit),
        "t" => Some(WatchCommand::Dispatch(Action::ToggleThemeMode)),
        "v" => Some(WatchCommand::Dispatch(Action::ToggleViewMode)),
        _ => None,
    }
}

fn build_store(args: &DashboardArgs) -> Store {
    let mut store = Store::with_preferences(PreferenceStore::default_location());
    if let Some(view) = args.view {
        store.dispatch(Action::SetViewMode(view));
    }
    if let Some(theme) = args.theme {
        store.dispatch(Action::SetThemeMode(theme));
    }
    if !args.query.is_empty() {
        store.dispatch(Action::SetQuery(args.query.clone()));
    }
    store
}

fn draw(state: &DashboardState, watch: bool) {
    let frame = render(&derive_view(state), Utc::now());
    if watch {
        print!("{}{}\n{}\n", CLEAR_SCREEN, frame, WATCH_HELP);
    } else {
        print!("{}", frame);
    }
}

/// Run the dashboard client
pub async fn handle_dashboard(args: DashboardArgs) -> Result<()> {
    let api: Arc<dyn AppsApi> = Arc::new(
        HttpApiClient::new(&args.url, DEFAULT_REQUEST_TIMEOUT)
            .context("Failed to create API client")?,
    );
    let mut store = build_store(&args);
    let (mut refresher, mut actions) = Refresher::new(api, args.interval);
    refresher.start();

    if args.watch {
        let input = BufReader::new(tokio::io::stdin());
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        watch_loop(&mut store, &mut refresher, &mut actions, input, shutdown).await
    } else {
        once(&mut store, &mut actions).await
    }
}

/// Wait for the initial load, print once, exit non-zero on failure
async fn once(
    store: &mut Store,
    actions: &mut tokio::sync::mpsc::UnboundedReceiver<Action>,
) -> Result<()> {
    while let Some(action) = actions.recv().await {
        let finished = matches!(action, Action::LoadSucceeded { .. } | Action::LoadFailed(_));
        store.dispatch(action);
        if finished {
            break;
        }
    }

    let state = store.state();
    draw(state, false);
    match derive_view(state).status {
        ViewStatus::Error(message) => Err(anyhow::anyhow!("Failed to load applications: {}", message)),
        _ => Ok(()),
    }
}

/// Redraw on every action, command or clock tick until quit or `shutdown`
async fn watch_loop<R, F>(
    store: &mut Store,
    refresher: &mut Refresher,
    actions: &mut tokio::sync::mpsc::UnboundedReceiver<Action>,
    input: R,
    shutdown: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    let mut input = input.lines();
    let mut stdin_open = true;
    // Redraw periodically so "last synced" keeps ticking
    let mut clock = tokio::time::interval(Duration::from_secs(5));
    tokio::pin!(shutdown);

    draw(store.state(), true);
    loop {
        tokio::select! {
            action = actions.recv() => match action {
                Some(action) => store.dispatch(action),
                None => break,
            },
            line = input.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_watch_command(&line) {
                    Some(WatchCommand::Quit) => break,
                    Some(WatchCommand::Retry) => refresher.retry(),
                    Some(WatchCommand::Dispatch(action)) => store.dispatch(action),
                    None => {}
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::debug!("Stopped reading stdin: {}", e);
                    stdin_open = false;
                }
            },
            _ = clock.tick() => {}
            _ = &mut shutdown => break,
        }
        draw(store.state(), true);
    }

    refresher.stop();
    Ok(())
}
