use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_DIR: &str = ".crmpulse";
const CONFIG_FILE: &str = "config.json";
const MAX_FOLLOW_UP_WINDOW_DAYS: i64 = 3650;

/// Alert configuration stored in ~/.crmpulse/config.json
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertConfig {
    /// IANA zone used to decide which calendar day a due date falls on.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Trailing window of activity that produces a follow-up alert.
    #[serde(default = "default_follow_up_window_days")]
    pub follow_up_window_days: i64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_follow_up_window_days() -> i64 {
    7
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            follow_up_window_days: default_follow_up_window_days(),
        }
    }
}

/// Validated settings the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertSettings {
    pub timezone: Tz,
    pub follow_up_window: Duration,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            follow_up_window: Duration::days(7),
        }
    }
}

impl AlertConfig {
    pub fn settings(&self) -> Result<AlertSettings, ConfigError> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))?;

        if !(1..=MAX_FOLLOW_UP_WINDOW_DAYS).contains(&self.follow_up_window_days) {
            return Err(ConfigError::InvalidWindow(self.follow_up_window_days));
        }
        let follow_up_window = Duration::try_days(self.follow_up_window_days)
            .ok_or(ConfigError::InvalidWindow(self.follow_up_window_days))?;

        Ok(AlertSettings {
            timezone,
            follow_up_window,
        })
    }
}

/// Default config location, if a home directory can be resolved.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load config from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AlertConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No alert config at {}, using defaults", path.display());
        return Ok(AlertConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from ~/.crmpulse/config.json, falling back to defaults when
/// there is no home directory.
pub fn load_default_config() -> Result<AlertConfig, ConfigError> {
    match default_config_path() {
        Some(path) => load_config(&path),
        None => {
            log::warn!("Could not find home directory; using default alert config");
            Ok(AlertConfig::default())
        }
    }
}
