//! `config.toml` loading and command-line overrides.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{api::HostMap, i18n::Locale};

const APP_DIR: &str = "moon-console";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub show_help: bool,
    pub confirm_exit: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            show_help: true,
            confirm_exit: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub lookup_ms: u64,
    pub detail_ms: u64,
    pub search_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            lookup_ms: 100,
            detail_ms: 500,
            search_ms: 200,
        }
    }
}

impl DebounceConfig {
    pub fn lookup(&self) -> Duration {
        Duration::from_millis(self.lookup_ms)
    }

    pub fn detail(&self) -> Duration {
        Duration::from_millis(self.detail_ms)
    }

    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Console origin used to pick the backend from the host map.
    pub origin: String,
    pub host_map: IndexMap<String, String>,
    pub locale: Locale,
    pub state_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub request_timeout_ms: u64,
    pub ui: UiConfig,
    pub debounce: DebounceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5173".to_string(),
            host_map: IndexMap::new(),
            locale: Locale::default(),
            state_dir: None,
            log_dir: None,
            log_level: None,
            request_timeout_ms: 10_000,
            ui: UiConfig::default(),
            debounce: DebounceConfig::default(),
        }
    }
}

/// Values given on the command line; each one beats the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub origin: Option<String>,
    pub locale: Option<Locale>,
    pub state_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl AppConfig {
    /// Loads `path`, or the default location when `path` is `None`. A
    /// missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let config: AppConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })?;
        config.check()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(origin) = overrides.origin {
            self.origin = origin;
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        if let Some(dir) = overrides.state_dir {
            self.state_dir = Some(dir);
        }
        if let Some(level) = overrides.log_level {
            self.log_level = Some(level);
        }
        self
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.origin.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "origin",
                message: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_ms",
                message: "must be positive".to_string(),
            });
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "ui.tick_rate_ms",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn hosts(&self) -> HostMap {
        HostMap::default().with_overrides(&self.host_map)
    }

    pub fn base_url(&self) -> String {
        self.hosts().resolve(&self.origin)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.state_dir().join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_the_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
origin = "http://127.0.0.1:5173"
locale = "en-US"

[debounce]
search_ms = 300

[host_map]
"http://console.internal" = "http://api.internal:8000"
"#,
        )
        .unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.debounce.search(), Duration::from_millis(300));
        assert_eq!(config.debounce.detail(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.base_url(), "http://localhost:8000");

        let custom = config.apply(ConfigOverrides {
            origin: Some("http://console.internal/".into()),
            ..ConfigOverrides::default()
        });
        assert_eq!(custom.base_url(), "http://api.internal:8000");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "request_timeout_ms = 0\n").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn overrides_beat_the_file() {
        let config = AppConfig::default().apply(ConfigOverrides {
            locale: Some(Locale::EnUs),
            state_dir: Some(PathBuf::from("/tmp/moon")),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/moon/logs"));
    }
}
