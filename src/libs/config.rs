//! Application configuration.
//!
//! Settings live in `config.json` inside the platform data directory. A
//! missing file is not an error: [`Config::read`] falls back to the defaults,
//! which put the database next to the config as `projects.db`.
//!
//! ```rust,no_run
//! use tempus::libs::config::Config;
//!
//! let mut config = Config::read()?;
//! config.db_path = Some("/tmp/work.db".into());
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::{Db, DB_FILE_NAME};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Database file; `None` means `projects.db` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Resolved database file, `override_path` winning over the config.
    pub fn db_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        match override_path.or(self.db_path.as_deref()) {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(DataStorage::new().get_path(DB_FILE_NAME)?),
        }
    }

    /// Store handle for the resolved database file. Not yet initialized.
    pub fn db(&self, override_path: Option<&Path>) -> Result<Db> {
        Ok(Db::open(self.db_path(override_path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_read_keeps_db_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = Config {
            db_path: Some(dir.path().join("work.db")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::read_from(&path).unwrap(), config);
    }

    #[test]
    fn override_wins_over_configured_path() {
        let config = Config {
            db_path: Some(PathBuf::from("/configured.db")),
        };
        let resolved = config.db_path(Some(Path::new("/override.db"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/override.db"));
        assert_eq!(config.db_path(None).unwrap(), PathBuf::from("/configured.db"));
    }
}
