//! Forecastle model layer
//!
//! Structure:
//! - `app.rs` - the application record served by `/api/apps`
//! - `discovery_source.rs` - how an application was found
//! - `forecastle_app.rs` - the ForecastleApp custom resource

mod app;
mod discovery_source;
pub mod forecastle_app;

pub use app::App;
pub use discovery_source::DiscoverySource;
pub use forecastle_app::{ForecastleApp, ForecastleAppSpec};
