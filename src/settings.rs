//! User settings (`settings.toml` in the platform config directory)
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tuido";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Data folder used when `--data-folder` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_folder: Option<PathBuf>,
    #[serde(default)]
    pub notes: NotesSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesSettings {
    /// Maximum interval between saves while typing
    #[serde(default = "default_interval")]
    pub throttle_secs: f64,
    /// Quiet period after the last keystroke before saving
    #[serde(default = "default_interval")]
    pub debounce_secs: f64,
}

fn default_interval() -> f64 {
    5.0
}

impl Default for NotesSettings {
    fn default() -> Self {
        Self {
            throttle_secs: default_interval(),
            debounce_secs: default_interval(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_folder: None,
            notes: NotesSettings::default(),
        }
    }
}

/// Directory holding settings and UI state
/// Windows: %APPDATA%\tuido
/// macOS: ~/Library/Application Support/tuido
/// Linux: ~/.config/tuido
pub fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR))
}

pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.toml"))
}

/// Default data folder when neither the command line nor the settings name one
pub fn default_data_folder() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_dir().join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// First-run check: writes defaults when no settings file exists yet.
/// An unreadable file falls back to defaults. Problems come back as a
/// warning since this runs before logging is set up.
/// Returns (settings, is_first_run, warning)
pub fn check_first_run(path: &Path) -> (Settings, bool, Option<String>) {
    if !path.exists() {
        let settings = Settings::default();
        let warning = save_settings(path, &settings).err().map(|e| {
            format!("Could not write default settings to {}: {:#}", path.display(), e)
        });
        return (settings, true, warning);
    }

    match load_settings(path) {
        Ok(settings) => (settings, false, None),
        Err(e) => (
            Settings::default(),
            false,
            Some(format!("Ignoring invalid settings: {:#}", e)),
        ),
    }
}

/// `--data-folder` wins over the settings file, which wins over the platform default.
pub fn resolve_data_folder(cli: Option<&Path>, settings: &Settings) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| settings.data_folder.clone())
        .unwrap_or_else(default_data_folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuido").join("settings.toml");

        let (settings, first, warning) = check_first_run(&path);
        assert!(first);
        assert!(warning.is_none());
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        let (again, first, _) = check_first_run(&path);
        assert!(!first);
        assert_eq!(again, settings);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[notes]\nthrottle_secs = 2.5\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.notes.throttle_secs, 2.5);
        assert_eq!(settings.notes.debounce_secs, 5.0);
        assert_eq!(settings.data_folder, None);
    }

    #[test]
    fn test_invalid_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "notes = 3").unwrap();

        let (settings, first, warning) = check_first_run(&path);
        assert!(!first);
        assert_eq!(settings, Settings::default());
        assert!(warning.unwrap().starts_with("Ignoring invalid settings"));
    }

    #[test]
    fn test_resolve_data_folder_precedence() {
        let mut settings = Settings::default();
        settings.data_folder = Some(PathBuf::from("/from/settings"));

        assert_eq!(
            resolve_data_folder(Some(Path::new("/from/cli")), &settings),
            PathBuf::from("/from/cli")
        );
        assert_eq!(
            resolve_data_folder(None, &settings),
            PathBuf::from("/from/settings")
        );
        assert_eq!(
            resolve_data_folder(None, &Settings::default()),
            default_data_folder()
        );
    }
}
