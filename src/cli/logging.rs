//! Logging initialization

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Server logging: always on, to stderr
///
/// `info` by default, `debug` with the debug flag; `RUST_LOG` overrides both.
pub fn init_server_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(level))
        .with_target(debug)
        .init();
}

/// Dashboard logging: silent unless debug, then to a temp file
///
/// The terminal belongs to the rendered dashboard, so logs never go there.
/// Returns the log file path if debug logging is enabled.
pub fn init_dashboard_logging(debug: bool) -> Option<PathBuf> {
    if !debug {
        return None;
    }

    // Keep the file after exit so it can be read
    let (file, path) = match tempfile::Builder::new()
        .prefix("forecastle-")
        .suffix(".log")
        .tempfile()
        .and_then(|f| f.keep().map_err(|e| e.error))
    {
        Ok(kept) => kept,
        Err(e) => {
            eprintln!("Failed to create debug log file: {}", e);
            return None;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_env_filter(env_filter("debug"))
        .with_ansi(false) // No ANSI codes in log file
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(path)
}
