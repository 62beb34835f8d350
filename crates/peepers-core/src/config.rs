use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PeepersError;
use crate::theme::Theme;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub anilist: AniListConfig,
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub base_url: String,
    /// v4 read access token; empty means unset.
    #[serde(default)]
    pub read_token: String,
    /// v3 API key; empty means unset.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AniListConfig {
    pub api_url: String,
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub debounce_ms: u64,
    pub rotation_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppearanceConfig {
    pub default_theme: ThemePreference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write a daily log file under the data directory.
    pub file: bool,
}

/// Theme used when nothing has been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    Light,
    /// Follow the desktop's light/dark setting.
    System,
}

impl ThemePreference {
    /// Resolve `System` to a concrete theme.
    pub fn resolve(self) -> Theme {
        match self {
            Self::Dark => Theme::Dark,
            Self::Light => Theme::Light,
            Self::System => match dark_light::detect() {
                Ok(dark_light::Mode::Light) => Theme::Light,
                _ => Theme::Dark,
            },
        }
    }
}

/// Upper bounds for the configured intervals.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;
pub const MAX_ROTATION_SECS: u64 = 24 * 60 * 60;

/// Debounce and rotation intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub debounce: Duration,
    pub rotation: Duration,
}

impl TimingConfig {
    pub fn timing(&self) -> Timing {
        Timing {
            debounce: Duration::from_millis(self.debounce_ms.min(MAX_DEBOUNCE_MS)),
            // A zero interval would spin the rotation timer.
            rotation: Duration::from_secs(self.rotation_secs.clamp(1, MAX_ROTATION_SECS)),
        }
    }
}

impl TmdbConfig {
    pub fn read_token(&self) -> Option<&str> {
        Some(self.read_token.as_str()).filter(|s| !s.trim().is_empty())
    }

    pub fn api_key(&self) -> Option<&str> {
        Some(self.api_key.as_str()).filter(|s| !s.trim().is_empty())
    }

    pub fn has_credentials(&self) -> bool {
        self.read_token().is_some() || self.api_key().is_some()
    }
}

fn config_err(e: impl std::fmt::Display) -> PeepersError {
    PeepersError::Config(e.to_string())
}

/// Recursively overlay `user` onto `base`; tables merge, everything else replaces.
fn merge(base: &mut toml::Value, user: toml::Value) {
    match (base, user) {
        (toml::Value::Table(base), toml::Value::Table(user)) => {
            for (key, value) in user {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, user) => *base = user,
    }
}

impl AppConfig {
    /// Load config: user file (if it exists) merged over built-in defaults,
    /// then credentials from the environment.
    pub fn load() -> Result<Self, PeepersError> {
        let path = Self::config_path();
        let user = if path.exists() { Some(path) } else { None };
        let mut config = Self::from_sources(user.as_deref())?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, PeepersError> {
        let mut config = Self::from_sources(Some(path))?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn from_sources(user_path: Option<&Path>) -> Result<Self, PeepersError> {
        let mut value: toml::Value = toml::from_str(DEFAULT_CONFIG).map_err(config_err)?;

        if let Some(path) = user_path {
            tracing::debug!(path = %path.display(), "loading user config");
            let user_str = std::fs::read_to_string(path).map_err(config_err)?;
            let user: toml::Value = toml::from_str(&user_str).map_err(config_err)?;
            merge(&mut value, user);
        }

        value.try_into().map_err(config_err)
    }

    /// `TMDB_READ_TOKEN` and `TMDB_API_KEY` win over the file.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("TMDB_READ_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.tmdb.read_token = token;
        }
        if let Some(key) = var("TMDB_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.tmdb.api_key = key;
        }
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Directory for the preference file and logs.
    pub fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "peepers")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
