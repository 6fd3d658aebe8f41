//! Forecastle library
//!
//! This library provides the core functionality for the forecastle binary.
//! It can be used both as a binary and as a library for testing.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod discovery;
pub mod kube;
pub mod models;
pub mod server;

// Re-export commonly used types for convenience
pub use config::Config;
pub use dashboard::{GroupedApps, filter_groups, group_apps};
pub use discovery::{AppSource, Discovery, DiscoveryError, NamespaceScope};
pub use models::{App, DiscoverySource};
pub use server::{AppCache, AppState, build_router};
