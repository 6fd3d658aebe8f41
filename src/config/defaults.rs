//! Default configuration values
//!
//! Provides default configuration instances and the defaults shared by the
//! server and dashboard commands.

use super::schema::Config;
use std::time::Duration;

/// Port the HTTP server listens on
pub const DEFAULT_PORT: u16 = 3000;

/// How often the server re-runs discovery
pub const DEFAULT_CACHE_INTERVAL: Duration = Duration::from_secs(20);

/// How often the dashboard polls the server
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Server the dashboard talks to when no URL is given
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Per-request timeout for the dashboard's HTTP client
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Get the default configuration
pub fn default_config() -> Config {
    Config::default()
}
