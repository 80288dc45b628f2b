use std::path::PathBuf;

use super::ExplorerConfig;
use crate::error::{AppError, AppResult};

pub const ENV_PREFIX: &str = "CATALOG_EXPLORER_";

/// Abstraction over environment-variable lookups so tests can supply their own map
pub trait EnvSource {
    /// Lookup by key WITHOUT the prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

impl EnvSource for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}

/// Apply environment-variable overrides (highest priority) to the config
pub fn apply_env_overrides<E: EnvSource>(config: &mut ExplorerConfig, env: &E) -> AppResult<()> {
    if let Some(url) = get_env_string(env, "BASE_URL") {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = get_env_string(env, "LIST_PATH") {
        config.list_path = path.trim_matches('/').to_string();
    }
    if let Some(size) = get_env_parsed::<u32, E>(env, "PAGE_SIZE")? {
        config.page_size = size;
    }
    if let Some(secs) = get_env_parsed::<u64, E>(env, "REQUEST_TIMEOUT_SECS")? {
        config.request_timeout_secs = secs;
    }
    if let Some(path) = get_env_string(env, "STORAGE_PATH") {
        config.storage_path = Some(PathBuf::from(path));
    }
    if let Some(enabled) = get_env_bool(env, "PERSISTENCE")? {
        config.persistence_enabled = enabled;
    }
    if let Some(key) = get_env_string(env, "PREFERENCES_KEY") {
        config.preferences_key = key;
    }
    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn get_env_parsed<T, E>(env: &E, key: &str) -> AppResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    E: EnvSource,
{
    match get_env_string(env, key) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
            AppError::Config(format!("Invalid {}{} value '{}': {}", ENV_PREFIX, key, raw, e))
        }),
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> AppResult<Option<bool>> {
    match get_env_string(env, key) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(AppError::Config(format!(
                "Invalid {}{} value '{}': expected a boolean",
                ENV_PREFIX, key, raw
            ))),
        },
        None => Ok(None),
    }
}
