//! Dashboard state and reducer
//!
//! All dashboard state lives in one [`DashboardState`] value. It changes only
//! through [`reduce`], which makes every transition a plain function that can
//! be tested without a runtime. [`Store`] wraps the reducer with preference
//! persistence and change notification.

use super::client::DisplayConfig;
use super::grouping::{GroupedApps, group_apps};
use super::prefs::{PreferenceStore, ThemeMode, ViewMode};
use crate::models::App;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

/// Application list slice
#[derive(Debug, Clone, PartialEq)]
pub struct AppsState {
    /// Grouped snapshot; shared so unchanged refreshes keep the same allocation
    pub data: Arc<GroupedApps>,
    pub is_loading: bool,
    pub is_loaded: bool,
    pub error: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
}

impl Default for AppsState {
    fn default() -> Self {
        Self {
            data: Arc::new(GroupedApps::default()),
            is_loading: true,
            is_loaded: false,
            error: None,
            last_synced: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub theme_mode: ThemeMode,
    pub view_mode: ViewMode,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub apps: AppsState,
    pub filters: FilterState,
    pub ui: UiState,
    /// Display config, once fetched
    pub config: Option<DisplayConfig>,
}

/// Everything that can change dashboard state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Initial load (or retry) began
    LoadStarted,
    /// Initial load finished
    LoadSucceeded { apps: Vec<App>, at: DateTime<Utc> },
    /// Initial load failed with a classified message
    LoadFailed(String),
    /// Background refresh finished
    RefreshSucceeded { apps: Vec<App>, at: DateTime<Utc> },
    SetConfig(DisplayConfig),
    SetQuery(String),
    SetThemeMode(ThemeMode),
    ToggleThemeMode,
    SetViewMode(ViewMode),
    ToggleViewMode,
}

/// A persisted UI preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Theme,
    ViewMode,
}

impl Action {
    /// The preference this action changes, if any
    pub fn preference(&self) -> Option<Preference> {
        match self {
            Action::SetThemeMode(_) | Action::ToggleThemeMode => Some(Preference::Theme),
            Action::SetViewMode(_) | Action::ToggleViewMode => Some(Preference::ViewMode),
            _ => None,
        }
    }
}

/// Apply one action to a state
pub fn reduce(state: &DashboardState, action: Action) -> DashboardState {
    let mut next = state.clone();
    match action {
        Action::LoadStarted => {
            next.apps.is_loading = true;
            next.apps.error = None;
        }
        Action::LoadSucceeded { apps, at } => {
            next.apps.data = Arc::new(group_apps(&apps));
            next.apps.is_loading = false;
            next.apps.is_loaded = true;
            next.apps.error = None;
            next.apps.last_synced = Some(at);
        }
        Action::LoadFailed(message) => {
            next.apps.is_loading = false;
            next.apps.is_loaded = false;
            next.apps.error = Some(message);
        }
        Action::RefreshSucceeded { apps, at } => {
            let grouped = group_apps(&apps);
            if *next.apps.data != grouped {
                next.apps.data = Arc::new(grouped);
            }
            // A refresh that lands after a failed load recovers the view
            next.apps.is_loading = false;
            next.apps.is_loaded = true;
            next.apps.error = None;
            next.apps.last_synced = Some(at);
        }
        Action::SetConfig(config) => {
            next.config = Some(config);
        }
        Action::SetQuery(query) => {
            next.filters.query = query;
        }
        Action::SetThemeMode(theme) => {
            next.ui.theme_mode = theme;
        }
        Action::ToggleThemeMode => {
            next.ui.theme_mode = next.ui.theme_mode.toggled();
        }
        Action::SetViewMode(view_mode) => {
            next.ui.view_mode = view_mode;
        }
        Action::ToggleViewMode => {
            next.ui.view_mode = next.ui.view_mode.toggled();
        }
    }
    next
}

/// Owner of the live dashboard state
pub struct Store {
    state: DashboardState,
    prefs: Option<PreferenceStore>,
    tx: watch::Sender<DashboardState>,
}

impl Store {
    /// Create a store without persistence
    pub fn new(initial: DashboardState) -> Self {
        let (tx, _rx) = watch::channel(initial.clone());
        Self {
            state: initial,
            prefs: None,
            tx,
        }
    }

    /// Create a store whose UI slice is loaded from and saved to `prefs`
    pub fn with_preferences(prefs: PreferenceStore) -> Self {
        let initial = DashboardState {
            ui: UiState {
                theme_mode: prefs.load_theme(),
                view_mode: prefs.load_view_mode(),
            },
            ..Default::default()
        };
        let mut store = Self::new(initial);
        store.prefs = Some(prefs);
        store
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Receive a copy of every new state
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.tx.subscribe()
    }

    /// Apply an action, persist preference changes and notify subscribers
    pub fn dispatch(&mut self, action: Action) {
        let preference = action.preference();
        let next = reduce(&self.state, action);

        if let Some(preference) = preference {
            self.persist(preference, &next.ui);
        }

        if next != self.state {
            self.state = next;
            self.tx.send_replace(self.state.clone());
        }
    }

    /// Save only the changed key, so an untouched theme keeps following the system
    fn persist(&self, preference: Preference, ui: &UiState) {
        let Some(prefs) = &self.prefs else {
            return;
        };
        let result = match preference {
            Preference::Theme => prefs.save_theme(ui.theme_mode),
            Preference::ViewMode => prefs.save_view_mode(ui.view_mode),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to save {:?} preference: {:#}", preference, e);
        }
    }
}
