//! Calendar configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::BackendConfig;
use crate::constants::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REMOTE_URL, DEFAULT_TIMEZONE,
};
use crate::error::{CalendarError, CalendarResult};

static DEFAULT_DATA_DIR: &str = "~/.twacal";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

/// Configuration at ~/.config/twacal/config.toml
///
/// Every key can be overridden from the environment with a `TWACAL_`
/// prefix; backend parameters use a double underscore, e.g.
/// `TWACAL_BACKEND__PROJECT_ID`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalendarConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub backend: BackendConfig,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            data_dir: default_data_dir(),
            remote_url: default_remote_url(),
            admin_password: default_admin_password(),
            timezone: default_timezone(),
            poll_interval_secs: default_poll_interval_secs(),
            backend: BackendConfig::default(),
        }
    }
}

impl CalendarConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("twacal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file
    /// on first run.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus environment overrides.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("TWACAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            warn!("unknown timezone '{}', using {}", self.timezone, DEFAULT_TIMEZONE);
            chrono_tz::Asia::Manila
        })
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz()).date_naive()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// The effective configuration as TOML, with secrets masked.
    pub fn to_redacted_toml(&self) -> CalendarResult<String> {
        let mut shown = self.clone();
        shown.admin_password = "********".into();
        if shown.backend.api_key.is_some() {
            shown.backend.api_key = Some("********".into());
        }
        toml::to_string_pretty(&shown).map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# twacal configuration

# Where events and preferences are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Read-only feed checked at startup:
# remote_url = \"{DEFAULT_REMOTE_URL}\"

# Shared admin password:
# admin_password = \"...\"

# Timezone used to decide what \"today\" is:
# timezone = \"{DEFAULT_TIMEZONE}\"

# Seconds between backend polls while watching:
# poll_interval_secs = {DEFAULT_POLL_INTERVAL_SECS}

# Hosted document backend (enabled when api_key and project_id are set):
# [backend]
# api_key = \"...\"
# auth_domain = \"...\"
# project_id = \"...\"
# storage_bucket = \"...\"
# messaging_sender_id = \"...\"
# app_id = \"...\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_default_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twacal").join("config.toml");
        CalendarConfig::create_default_config(&path).unwrap();

        let config = CalendarConfig::load_from(&path).unwrap();
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
        assert_eq!(config.timezone, "Asia/Manila");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert!(!config.backend.is_enabled());
    }

    #[test]
    fn test_config_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/twacal\"\n\
             admin_password = \"s3cret\"\n\
             timezone = \"Europe/Oslo\"\n\
             poll_interval_secs = 0\n\
             [backend]\n\
             api_key = \"abc\"\n\
             project_id = \"school-cal\"\n",
        )
        .unwrap();

        let config = CalendarConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/srv/twacal"));
        assert_eq!(config.admin_password, "s3cret");
        assert_eq!(config.tz(), chrono_tz::Europe::Oslo);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(config.backend.is_enabled());
    }

    #[test]
    fn test_unknown_timezone_falls_back() {
        let config = CalendarConfig {
            timezone: "Mars/Olympus".into(),
            ..Default::default()
        };
        assert_eq!(config.tz(), chrono_tz::Asia::Manila);
    }

    #[test]
    fn test_redacted_toml_hides_secrets() {
        let mut config = CalendarConfig::default();
        config.backend.api_key = Some("abc".into());
        let text = config.to_redacted_toml().unwrap();
        assert!(!text.contains("ros123"));
        assert!(!text.contains("\"abc\""));
        assert!(text.contains("remote_url"));
    }
}
