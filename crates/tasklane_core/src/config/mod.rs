use crate::error::AppError;
use crate::ordering::DEFAULT_PROGRESS_LISTS;
use crate::timer::DEFAULT_POLL_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLANE_CONFIG_PATH";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    #[serde(default)]
    pub progress_lists: Option<usize>,
    #[serde(default)]
    pub notifications: Option<bool>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    pub fn progress_lists(&self) -> usize {
        self.progress_lists.unwrap_or(DEFAULT_PROGRESS_LISTS)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications.unwrap_or(true)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub poll_interval_secs: Option<u64>,
    pub progress_lists: Option<usize>,
    pub notifications: Option<bool>,
    pub log_level: Option<String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklane")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklane")
            .join(CONFIG_FILE_NAME))
    }
}

/// Loads the config, falling back to defaults and reporting why.
///
/// A missing file is not an error.
pub fn load_config_with_fallback(explicit: Option<&Path>) -> ConfigLoad {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Ok(path) => path,
            Err(err) => {
                return ConfigLoad {
                    config: Config::default(),
                    error: Some(err),
                };
            }
        },
    };
    load_config_with_fallback_from_path(&path)
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => {
            info!(path = %path.display(), "config loaded");
            ConfigLoad {
                config,
                error: None,
            }
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config rejected; using defaults");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    validate(config)
        .map_err(|err| AppError::invalid_data(format!("{}: {}", path.display(), err.message())))
}

fn validate(mut config: Config) -> Result<Config, AppError> {
    if config.poll_interval_secs == Some(0) {
        return Err(AppError::invalid_data("poll_interval_secs must be at least 1"));
    }
    config.log_level = match config.log_level {
        Some(level) => Some(
            canonical_log_level(&level)
                .ok_or_else(|| AppError::invalid_data(format!("unknown log_level '{level}'")))?,
        ),
        None => None,
    };
    Ok(config)
}

/// Maps user spellings of a log level onto a `tracing` filter level.
pub fn canonical_log_level(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_ascii_lowercase();
    let level = match lowered.as_str() {
        "warning" => "warn",
        "err" => "error",
        other => other,
    };
    LOG_LEVELS
        .iter()
        .find(|known| **known == level)
        .map(|known| known.to_string())
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(secs) = overrides.poll_interval_secs {
        merged.poll_interval_secs = Some(secs.max(1));
    }
    if let Some(count) = overrides.progress_lists {
        merged.progress_lists = Some(count);
    }
    if let Some(enabled) = overrides.notifications {
        merged.notifications = Some(enabled);
    }
    if let Some(level) = overrides.log_level.as_deref().and_then(canonical_log_level) {
        merged.log_level = Some(level);
    }
    merged
}
