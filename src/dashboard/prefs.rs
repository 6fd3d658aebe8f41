//! UI preference persistence
//!
//! Preferences are stored as a flat JSON object of string keys to
//! JSON-encoded string values, mirroring browser local storage. Each value
//! is read and written independently so one corrupt entry never resets the
//! other.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Storage key for the theme mode
pub const THEME_KEY: &str = "forecastle-theme";

/// Storage key for the view mode
pub const VIEW_MODE_KEY: &str = "forecastle-view-mode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

/// Theme the terminal appears to prefer
///
/// `FORECASTLE_THEME` wins when it names a mode. Otherwise a dark background
/// in `COLORFGBG` (background color 0-6 or 8) means dark. Defaults to light.
pub fn system_theme_preference() -> ThemeMode {
    theme_from_env(
        std::env::var("FORECASTLE_THEME").ok().as_deref(),
        std::env::var("COLORFGBG").ok().as_deref(),
    )
}

fn theme_from_env(explicit: Option<&str>, colorfgbg: Option<&str>) -> ThemeMode {
    match explicit.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("dark") => return ThemeMode::Dark,
        Some("light") => return ThemeMode::Light,
        _ => {}
    }

    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match background {
        Some(bg) if bg <= 6 || bg == 8 => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// JSON-file-backed key/value preference store
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under the data directory
    pub fn default_location() -> Self {
        Self::new(crate::config::paths::preferences_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str::<Map<String, Value>>(&contents).ok())
            .unwrap_or_default()
    }

    /// Raw stored value for `key`, if present
    pub fn get_item(&self, key: &str) -> Option<String> {
        match self.read_all().remove(key)? {
            Value::String(raw) => Some(raw),
            _ => None,
        }
    }

    /// Store a raw value under `key`, keeping every other key
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.read_all();
        items.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            crate::config::paths::ensure_dir(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(&items).context("Failed to serialize preferences")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))?;
        Ok(())
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Ignoring unreadable preference {}: {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("Failed to encode preference")?;
        self.set_item(key, &raw)
    }

    /// Stored theme, falling back to the system preference
    pub fn load_theme(&self) -> ThemeMode {
        self.load(THEME_KEY).unwrap_or_else(system_theme_preference)
    }

    /// Stored view mode, falling back to grid
    pub fn load_view_mode(&self) -> ViewMode {
        self.load(VIEW_MODE_KEY).unwrap_or_default()
    }

    pub fn save_theme(&self, theme: ThemeMode) -> Result<()> {
        self.save(THEME_KEY, &theme)
    }

    pub fn save_view_mode(&self, view_mode: ViewMode) -> Result<()> {
        self.save(VIEW_MODE_KEY, &view_mode)
    }
}
