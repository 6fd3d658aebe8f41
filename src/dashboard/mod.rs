//! Dashboard client
//!
//! Everything between the apps API and the screen:
//! - `client.rs` - HTTP access and error classification
//! - `sort.rs`, `grouping.rs`, `filter.rs` - the pure derivation pipeline
//! - `store.rs` - state, actions and the reducer
//! - `refresh.rs` - initial load and background polling
//! - `prefs.rs` - theme and view mode persistence
//! - `render.rs` - view model and text layout

pub mod client;
pub mod filter;
pub mod grouping;
pub mod prefs;
pub mod refresh;
pub mod render;
pub mod sort;
pub mod store;

pub use client::{AppsApi, DisplayConfig, FetchError, HttpApiClient};
pub use filter::filter_groups;
pub use grouping::{AppGroup, GroupedApps, group_apps};
pub use prefs::{PreferenceStore, ThemeMode, ViewMode};
pub use refresh::Refresher;
pub use render::{DashboardView, EMPTY_STATE_TEXT, ViewStatus, derive_view, format_elapsed, render};
pub use sort::natural_cmp;
pub use store::{Action, DashboardState, Preference, Store, reduce};
