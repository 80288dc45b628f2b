// src/config/mod.rs
//
// Runtime configuration
//
// Precedence: built-in defaults < environment overrides.
// The page size lives here and only here, so the fetch limit and the
// page-count arithmetic can never disagree.

pub mod env_overrides;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub use env_overrides::{apply_env_overrides, EnvSource, SystemEnv, ENV_PREFIX};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_LIST_PATH: &str = "pokemon";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PREFERENCES_KEY: &str = "catalogPreferences";

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    /// Root of the upstream catalog service
    pub base_url: String,

    /// Collection path under `base_url` (list: `{base}/{path}`, detail: `{base}/{path}/{id}`)
    pub list_path: String,

    pub page_size: u32,

    pub request_timeout_secs: u64,

    /// SQLite file for preferences; `None` resolves to the platform data directory
    pub storage_path: Option<PathBuf>,

    /// When false, preference changes are kept in memory only
    pub persistence_enabled: bool,

    pub preferences_key: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_path: DEFAULT_LIST_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            storage_path: None,
            persistence_enabled: true,
            preferences_key: DEFAULT_PREFERENCES_KEY.to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Defaults plus overrides from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_source(&SystemEnv)
    }

    pub fn from_env_source<E: EnvSource>(env: &E) -> AppResult<Self> {
        let mut config = Self::default();
        apply_env_overrides(&mut config, env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("base_url cannot be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be greater than 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.preferences_key.trim().is_empty() {
            return Err(AppError::Config("preferences_key cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved preference database path
    ///
    /// Default structure: {DATA_DIR}/catalog-explorer/catalog-explorer.db
    pub fn resolve_storage_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.storage_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;

        Ok(data_dir.join("catalog-explorer").join("catalog-explorer.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExplorerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 20);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = ExplorerConfig {
            page_size: 0,
            ..ExplorerConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let config = ExplorerConfig {
            base_url: "  ".to_string(),
            ..ExplorerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_storage_path_wins() {
        let config = ExplorerConfig {
            storage_path: Some(PathBuf::from("/tmp/prefs.db")),
            ..ExplorerConfig::default()
        };
        assert_eq!(
            config.resolve_storage_path().unwrap(),
            PathBuf::from("/tmp/prefs.db")
        );
    }
}
