//! User configuration read from `config.toml` in the platform config
//! directory. Every key is optional; a missing file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::nav::Route;

/// Overrides `database_path` when set.
pub const DB_ENV_VAR: &str = "PERIPHERAL_STORE_DB";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "store.sqlite";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config validation failed: {message}")]
    Validation { message: String },

    #[error("could not locate a home directory for application data")]
    NoHomeDirectory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file holding the catalog. Defaults to the platform data dir.
    pub database_path: Option<PathBuf>,
    /// Name of the first screen. Must be a route without placeholders.
    pub start_route: String,
    /// How long the UI loop waits for input before polling background work.
    pub tick_rate_ms: u64,
    /// Log destination; logging stays off when neither this nor the
    /// environment variable is set.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            start_route: Route::Welcome.name().to_string(),
            tick_rate_ms: 250,
            log_file: None,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs, ConfigError> {
        ProjectDirs::from("dev", "peripheral-store", "peripheral-store")
            .ok_or(ConfigError::NoHomeDirectory)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(route) = Route::from_name(&self.start_route) else {
            return Err(ConfigError::Validation {
                message: format!("start_route '{}' is not a known screen", self.start_route),
            });
        };
        if !route.placeholders().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("start_route '{}' needs arguments", self.start_route),
            });
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Validation {
                message: "tick_rate_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the database file: env override, then config, then the
    /// platform data directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = env::var_os(DB_ENV_VAR).filter(|value| !value.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }
        Ok(Self::project_dirs()?.data_dir().join(DB_FILE_NAME))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.start_route, "welcome");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config("start_route = \"catalog\"\n");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.start_route, "catalog");
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
    }

    #[test]
    fn configured_database_path_is_used() {
        let (_dir, path) = write_config("database_path = \"/tmp/shop.sqlite\"\n");
        let config = AppConfig::load_from(&path).unwrap();
        if env::var_os(DB_ENV_VAR).is_none() {
            assert_eq!(
                config.database_path().unwrap(),
                PathBuf::from("/tmp/shop.sqlite")
            );
        }
    }

    #[test]
    fn rejects_unknown_start_route() {
        let (_dir, path) = write_config("start_route = \"checkout\"\n");
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_parameterized_start_route() {
        let (_dir, path) = write_config("start_route = \"profile\"\n");
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn rejects_zero_tick_rate() {
        let (_dir, path) = write_config("tick_rate_ms = 0\n");
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let (_dir, path) = write_config("start_route = \n");
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
