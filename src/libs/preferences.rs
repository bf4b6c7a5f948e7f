//! UI preferences kept outside the database.
//!
//! A flat string key/value store behind the [`PreferenceStore`] trait. The
//! file-backed [`JsonPreferences`] keeps everything in `preferences.json` in
//! the data directory; [`MemoryPreferences`] is for tests and throwaway
//! sessions.

use super::data_storage::DataStorage;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub const ACTIVE_PROJECT_KEY: &str = "activeProjectId";
pub const THEME_KEY: &str = "theme";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Preferences persisted as a JSON object; every write rewrites the file.
#[derive(Debug)]
pub struct JsonPreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonPreferences {
    pub fn new() -> Result<Self> {
        Self::load(DataStorage::new().get_path(PREFERENCES_FILE_NAME)?)
    }

    /// Loads `path`. A missing file starts empty, and so does one that is not
    /// a flat JSON object of strings.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring unreadable preferences");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content).with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl PreferenceStore for JsonPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        self.flush(&updated)?;
        *values = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock();
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut updated = values.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *values = updated;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    /// Stored theme, `System` when unset or unrecognized.
    pub fn load(store: &dyn PreferenceStore) -> Theme {
        store.get(THEME_KEY).and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    pub fn save(self, store: &dyn PreferenceStore) -> Result<()> {
        store.set(THEME_KEY, &self.to_string())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown theme '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn unknown_stored_theme_falls_back_to_system() {
        let store = MemoryPreferences::new();
        assert_eq!(Theme::load(&store), Theme::System);
        store.set(THEME_KEY, "neon").unwrap();
        assert_eq!(Theme::load(&store), Theme::System);
        Theme::Dark.save(&store).unwrap();
        assert_eq!(Theme::load(&store), Theme::Dark);
    }

    #[test]
    fn malformed_preferences_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        fs::write(&path, r#"{"activeProjectId": 7}"#).unwrap();

        let prefs = JsonPreferences::load(&path).unwrap();
        assert_eq!(prefs.get(ACTIVE_PROJECT_KEY), None);

        // The next write replaces the broken file
        prefs.set(ACTIVE_PROJECT_KEY, "7").unwrap();
        let reloaded = JsonPreferences::load(&path).unwrap();
        assert_eq!(reloaded.get(ACTIVE_PROJECT_KEY).as_deref(), Some("7"));
    }

    #[test]
    fn failed_write_leaves_values_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);
        let prefs = JsonPreferences::load(&path).unwrap();
        prefs.set(THEME_KEY, "Dark").unwrap();

        // A directory in place of the file makes every write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(prefs.set(THEME_KEY, "Light").is_err());
        assert!(prefs.set(ACTIVE_PROJECT_KEY, "3").is_err());
        assert!(prefs.remove(THEME_KEY).is_err());
        assert_eq!(prefs.get(THEME_KEY).as_deref(), Some("Dark"));
        assert_eq!(prefs.get(ACTIVE_PROJECT_KEY), None);
    }

    #[test]
    fn json_preferences_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE_NAME);

        let prefs = JsonPreferences::load(&path).unwrap();
        prefs.set(ACTIVE_PROJECT_KEY, "7").unwrap();
        prefs.set(THEME_KEY, "Light").unwrap();
        prefs.remove(THEME_KEY).unwrap();

        let reloaded = JsonPreferences::load(&path).unwrap();
        assert_eq!(reloaded.get(ACTIVE_PROJECT_KEY).as_deref(), Some("7"));
        assert_eq!(reloaded.get(THEME_KEY), None);
    }
}
