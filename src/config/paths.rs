//! Cross-platform directory path resolution
//!
//! The configuration file is looked up in the same places a container image
//! or a workstation would keep it. Local state (UI preferences) lives in the
//! platform data directory.
//! - Linux/macOS: XDG Base Directory specification (~/.local/share)
//! - Windows: Known Folder API (AppData\Local)

use std::path::{Path, PathBuf};

/// File name looked up in every configuration directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Get the configuration file candidates, in lookup order
///
/// `FORECASTLE_CONFIG_DIR` replaces the whole list with a single directory.
/// Otherwise: `/etc/forecastle`, `$HOME/.forecastle`, then the working directory.
pub fn config_search_paths() -> Vec<PathBuf> {
    if let Ok(dir) = std::env::var("FORECASTLE_CONFIG_DIR") {
        return vec![PathBuf::from(dir).join(CONFIG_FILE_NAME)];
    }

    let mut candidates = vec![PathBuf::from("/etc/forecastle").join(CONFIG_FILE_NAME)];
    if let Some(dirs) = directories::BaseDirs::new() {
        candidates.push(dirs.home_dir().join(".forecastle").join(CONFIG_FILE_NAME));
    }
    candidates.push(PathBuf::from(".").join(CONFIG_FILE_NAME));
    candidates
}

/// First existing configuration file, if any
pub fn find_config_file() -> Option<PathBuf> {
    config_search_paths().into_iter().find(|path| path.exists())
}

/// Get the data directory path
///
/// Checks FORECASTLE_DATA_DIR environment variable first, then falls back to:
/// - Unix (Linux/macOS): XDG_DATA_HOME/forecastle or ~/.local/share/forecastle
/// - Windows: %LOCALAPPDATA%\forecastle\data
pub fn data_dir() -> PathBuf {
    std::env::var("FORECASTLE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", "forecastle")
                    .map(|dirs| dirs.data_dir().to_path_buf())
                    .unwrap_or_else(|| {
                        PathBuf::from(".")
                            .join(".local")
                            .join("share")
                            .join("forecastle")
                    })
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_DATA_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".local").join("share"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".local").join("share"))
                    })
                    .join("forecastle")
            }
        })
}

/// Get the UI preferences file path
pub fn preferences_path() -> PathBuf {
    data_dir().join("preferences.json")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_paths_end_with_config_file() {
        for path in config_search_paths() {
            assert!(path.ends_with(CONFIG_FILE_NAME));
        }
    }

    #[test]
    fn test_preferences_live_in_data_dir() {
        assert!(preferences_path().starts_with(data_dir()));
        assert!(data_dir().to_string_lossy().contains("forecastle"));
    }
}
