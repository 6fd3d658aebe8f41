//! View model and plain-text rendering
//!
//! [`derive_view`] turns store state into exactly what should be shown;
//! [`render`] lays that out as text for the terminal.

use super::filter::filter_groups;
use super::grouping::{AppGroup, GroupedApps};
use super::prefs::{ThemeMode, ViewMode};
use super::store::DashboardState;
use crate::models::App;
use chrono::{DateTime, Utc};

/// Apps per row in grid layout
pub const GRID_COLUMNS: usize = 3;

/// Text shown when nothing matches
pub const EMPTY_STATE_TEXT: &str = "No results found matching your query";

/// What the body of the dashboard shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    /// Blocking error from the initial load
    Error(String),
    Empty,
    Ready,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub theme_mode: ThemeMode,
    pub view_mode: ViewMode,
    pub query: String,
    pub status: ViewStatus,
    /// Filtered groups, in display order
    pub groups: GroupedApps,
    pub last_synced: Option<DateTime<Utc>>,
}

/// Project store state onto a view
pub fn derive_view(state: &DashboardState) -> DashboardView {
    let groups = filter_groups(&state.apps.data, &state.filters.query);

    let status = if let Some(error) = &state.apps.error {
        ViewStatus::Error(error.clone())
    } else if state.apps.is_loading && !state.apps.is_loaded {
        ViewStatus::Loading
    } else if groups.is_empty() {
        ViewStatus::Empty
    } else {
        ViewStatus::Ready
    };

    DashboardView {
        title: state
            .config
            .as_ref()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "Forecastle".to_string()),
        theme_mode: state.ui.theme_mode,
        view_mode: state.ui.view_mode,
        query: state.filters.query.clone(),
        status,
        groups,
        last_synced: state.apps.last_synced,
    }
}

/// Relative "last synced" label
pub fn format_elapsed(last_synced: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(synced) = last_synced else {
        return "Syncing...".to_string();
    };

    let seconds = (now - synced).num_seconds().max(0);
    if seconds < 5 {
        "Just now".to_string()
    } else if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3600)
    }
}

/// Render a view as terminal text
pub fn render(view: &DashboardView, now: DateTime<Utc>) -> String {
    let mut lines = vec![format!(
        "{}  [{}/{}]  Last synced: {}",
        view.title,
        view.theme_mode.as_str(),
        view.view_mode.as_str(),
        format_elapsed(view.last_synced, now)
    )];
    if !view.query.is_empty() {
        lines.push(format!("Search: {}", view.query));
    }
    lines.push(String::new());

    match &view.status {
        ViewStatus::Loading => lines.push("Loading applications...".to_string()),
        ViewStatus::Error(message) => {
            lines.push(format!("Unable to load applications: {}", message));
            lines.push("Press r to retry".to_string());
        }
        ViewStatus::Empty => lines.push(EMPTY_STATE_TEXT.to_string()),
        ViewStatus::Ready => {
            for (i, group) in view.groups.groups().iter().enumerate() {
                if i > 0 {
                    lines.push(String::new());
                }
                render_group(group, view.view_mode, &mut lines);
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_group(group: &AppGroup, view_mode: ViewMode, lines: &mut Vec<String>) {
    lines.push(format!(
        "== {} ({}) ==",
        group.name.to_uppercase(),
        group.apps.len()
    ));

    match view_mode {
        ViewMode::List => {
            for app in &group.apps {
                lines.push(format!("  - {} -> {}", app_label(app), app.url));
            }
        }
        ViewMode::Grid => {
            let cells: Vec<String> = group.apps.iter().map(app_label).collect();
            let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
            for row in cells.chunks(GRID_COLUMNS) {
                let row = row
                    .iter()
                    .map(|cell| format!("{:<width$}", cell, width = width))
                    .collect::<Vec<_>>()
                    .join(" | ");
                lines.push(format!("  {}", row.trim_end()));
            }
        }
    }
}

/// App name plus any markers
fn app_label(app: &App) -> String {
    let mut label = app.name.clone();
    if app.network_restricted {
        label.push_str(" [restricted]");
    }
    if !app.discovery_source.is_known() {
        label.push_str(&format!(" [{}]", app.discovery_source.label()));
    }
    label
}
