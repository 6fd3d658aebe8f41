//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod config;
mod dashboard;
mod logging;
mod serve;
mod version;

pub use config::{ConfigSubcommand, handle_config_command};
pub use dashboard::{DashboardArgs, WatchCommand, handle_dashboard, parse_watch_command};
pub use logging::*;
pub use serve::{ServeArgs, handle_serve};
pub use version::display_version;

use anyhow::{Context, Result};
use std::time::Duration;

/// Parse duration string (e.g., "30s", "1m", "500ms")
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    let duration = if let Some(ms) = s.strip_suffix("ms") {
        Duration::from_millis(ms.parse().context("Invalid duration")?)
    } else if let Some(secs) = s.strip_suffix('s') {
        Duration::from_secs(secs.parse().context("Invalid duration")?)
    } else if let Some(mins) = s.strip_suffix('m') {
        let mins: u64 = mins.parse().context("Invalid duration")?;
        Duration::from_secs(mins * 60)
    } else if let Some(hours) = s.strip_suffix('h') {
        let hours: u64 = hours.parse().context("Invalid duration")?;
        Duration::from_secs(hours * 3600)
    } else if let Ok(secs) = s.parse::<u64>() {
        Duration::from_secs(secs)
    } else {
        anyhow::bail!("Invalid duration format: {}", s)
    };

    if duration.is_zero() {
        anyhow::bail!("Duration must be greater than zero: {}", s);
    }
    Ok(duration)
}
