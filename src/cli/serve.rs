//! `serve` command

use super::parse_duration;
use crate::config::ConfigLoader;
use crate::config::defaults::DEFAULT_PORT;
use crate::server::{ServerOptions, run_server};
use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use std::time::Duration;

/// Options for the HTTP server
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', env = "FORECASTLE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// How often to re-run discovery (e.g. "20s", "1m")
    #[arg(long, env = "FORECASTLE_CACHE_INTERVAL", default_value = "20s", value_parser = parse_duration)]
    pub cache_interval: Duration,

    /// Serve the API under this path prefix
    #[arg(long, env = "FORECASTLE_BASE_PATH")]
    pub base_path: Option<String>,
}

/// Load configuration and run the server
pub async fn handle_serve(args: ServeArgs, config_file: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_file).context("Failed to load configuration")?;
    if let Err(e) = ConfigLoader::check(&config) {
        tracing::warn!("Configuration problem: {}", e);
    }

    tracing::info!(
        title = %config.title,
        instance = %config.instance_name,
        custom_apps = config.custom_apps.len(),
        crd_enabled = config.crd_enabled,
        "Configuration loaded"
    );

    let options = ServerOptions {
        port: args.port,
        cache_interval: args.cache_interval,
        base_path: args.base_path,
    };
    run_server(options, config).await
}
