//! Forecastle - a dashboard for applications running in Kubernetes
//!
//! `serve` discovers annotated Ingresses, HTTPRoutes, ForecastleApp resources
//! and configured apps, and serves them over HTTP. `dashboard` is a terminal
//! client for that API.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use forecastle::cli::{self, ConfigSubcommand, DashboardArgs, ServeArgs};
use std::path::PathBuf;

/// Forecastle - a dashboard for applications running in Kubernetes
#[derive(Parser, Debug)]
#[command(name = "forecastle")]
#[command(about = "Discover applications in Kubernetes and serve them as a dashboard", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Configuration file (default: first of /etc/forecastle, ~/.forecastle, ./config.yaml)
    #[arg(long, short = 'c', env = "FORECASTLE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Server options when no subcommand is given
    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Show the dashboard of a running server in the terminal
    Dashboard(DashboardArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

/// Top-level server options; they only apply when no subcommand is given
const TOP_LEVEL_SERVE_ARGS: [&str; 3] = ["port", "cache_interval", "base_path"];

/// Parse arguments, rejecting server options placed before a subcommand
///
/// `forecastle --port 4000 serve` would otherwise parse the top-level port and
/// then run `serve` with its own default. Global flags such as `--debug` stay
/// allowed in front of a subcommand.
fn parse_args<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = Args::command().try_get_matches_from(args)?;
    if let Some((subcommand, _)) = matches.subcommand() {
        if let Some(id) = misplaced_serve_arg(&matches) {
            return Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                format!(
                    "--{} must come after the subcommand (e.g. `forecastle {} --{} ...`)",
                    id.replace('_', "-"),
                    subcommand,
                    id.replace('_', "-")
                ),
            ));
        }
    }
    Args::from_arg_matches(&matches)
}

fn misplaced_serve_arg(matches: &ArgMatches) -> Option<&'static str> {
    TOP_LEVEL_SERVE_ARGS
        .into_iter()
        .find(|id| matches.value_source(id) == Some(ValueSource::CommandLine))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    match args.command {
        Some(Command::Config { subcommand }) => {
            cli::handle_config_command(subcommand, args.config.as_deref())
        }
        Some(Command::Version) => {
            cli::display_version();
            Ok(())
        }
        Some(Command::Dashboard(dashboard)) => {
            // Print log file location before drawing so it isn't cleared
            if let Some(log_path) = cli::init_dashboard_logging(args.debug) {
                eprintln!(
                    "Debug logging enabled. Logs written to: {}",
                    log_path.display()
                );
            }
            cli::handle_dashboard(dashboard).await
        }
        Some(Command::Serve(serve)) => {
            cli::init_server_logging(args.debug);
            cli::handle_serve(serve, args.config.as_deref()).await
        }
        None => {
            cli::init_server_logging(args.debug);
            cli::handle_serve(args.serve, args.config.as_deref()).await
        }
    }
}
