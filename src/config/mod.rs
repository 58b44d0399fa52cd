use crate::core::paths::StorePaths;
use crate::errors::{AppError, AppResult};
use crate::utils::date::parse_day_start;
use crate::utils::path::{default_data_dir, expand_tilde};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "tempus.conf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default = "default_history_days")]
    pub history_days: i64,
    #[serde(default = "default_day_starts_at")]
    pub day_starts_at: String,
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}
fn default_history_days() -> i64 {
    180
}
fn default_day_starts_at() -> String {
    "04:30".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            history_days: default_history_days(),
            day_starts_at: default_day_starts_at(),
        }
    }
}

impl Config {
    /// Full path of the config file: always in the default data directory.
    pub fn config_file() -> PathBuf {
        default_data_dir().join(CONFIG_FILE)
    }

    /// Load the config file, or defaults if there is none.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| AppError::Configuration(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Configuration(e.to_string()))
    }

    /// Write this config to the config file, creating its directory.
    pub fn save(&self) -> AppResult<PathBuf> {
        let path = Self::config_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Configuration(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&path, self.to_yaml()?).map_err(|e| {
            AppError::Configuration(format!("cannot write {}: {e}", path.display()))
        })?;
        Ok(path)
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }

    pub fn store_paths(&self) -> StorePaths {
        StorePaths::new(self.data_dir())
    }

    /// Seconds past midnight at which a new working day begins.
    pub fn day_start_offset(&self) -> AppResult<i64> {
        parse_day_start(&self.day_starts_at)
            .map_err(|e| AppError::Configuration(format!("day_starts_at: {e}")))
    }
}
