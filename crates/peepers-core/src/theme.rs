//! Display theme preference.
//!
//! One process-wide [`ThemeStore`] holds the current theme, persists every
//! change through a [`PreferenceStorage`], and broadcasts changes over a
//! `watch` channel.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::{AppConfig, ThemePreference};
use crate::error::PeepersError;

const THEME_KEY: &str = "theme";
const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PeepersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(PeepersError::Preference(format!("unknown theme: {other}"))),
        }
    }
}

/// Key/value storage for user preferences.
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PeepersError>;
}

/// Preferences kept as a small JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `preferences.json` under the platform data directory.
    pub fn default_location() -> Self {
        Self::new(AppConfig::data_dir().join(FILE_NAME))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Missing or unreadable files read as empty.
    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "ignoring malformed preferences: {e}");
            BTreeMap::new()
        })
    }
}

impl PreferenceStorage for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PeepersError> {
        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| PeepersError::Preference(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl PreferenceStorage for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PeepersError> {
        self.values
            .lock()
            .map_err(|e| PeepersError::Preference(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct ThemeStore {
    storage: Box<dyn PreferenceStorage>,
    tx: watch::Sender<Theme>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore").field("theme", &self.get()).finish()
    }
}

impl ThemeStore {
    /// Read the stored theme, falling back to `default` when nothing valid
    /// is stored.
    pub fn init(storage: impl PreferenceStorage + 'static, default: ThemePreference) -> Self {
        let theme = storage
            .get(THEME_KEY)
            .and_then(|v| v.parse::<Theme>().ok())
            .unwrap_or_else(|| default.resolve());
        tracing::debug!(%theme, "theme initialized");

        let (tx, _rx) = watch::channel(theme);
        Self {
            storage: Box::new(storage),
            tx,
        }
    }

    pub fn get(&self) -> Theme {
        *self.tx.borrow()
    }

    /// Apply and persist. Subscribers see the new theme even if persisting fails.
    pub fn set(&self, theme: Theme) -> Result<(), PeepersError> {
        self.tx.send_replace(theme);
        self.storage.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle(&self) -> Result<Theme, PeepersError> {
        let next = self.get().toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }
}

static GLOBAL: OnceLock<ThemeStore> = OnceLock::new();

/// Install the process-wide store. Fails if one is already installed.
pub fn install(store: ThemeStore) -> Result<&'static ThemeStore, PeepersError> {
    GLOBAL
        .set(store)
        .map_err(|_| PeepersError::Preference("theme store already installed".into()))?;
    GLOBAL
        .get()
        .ok_or_else(|| PeepersError::Preference("theme store missing".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_missing_value_uses_default() {
        let store = ThemeStore::init(MemoryPreferences::default(), ThemePreference::Light);
        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn test_unknown_stored_value_uses_default() {
        let prefs = MemoryPreferences::default();
        prefs.set(THEME_KEY, "neon").unwrap();
        let store = ThemeStore::init(prefs, ThemePreference::Dark);
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn test_toggle_notifies_subscribers() {
        let store = ThemeStore::init(MemoryPreferences::default(), ThemePreference::Dark);
        let mut rx = store.subscribe();

        assert_eq!(store.toggle().unwrap(), Theme::Light);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Theme::Light);
    }

    #[test]
    fn test_file_preferences_persist_across_stores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILE_NAME);

        let store = ThemeStore::init(FilePreferences::new(&path), ThemePreference::Dark);
        store.set(Theme::Light).unwrap();

        let reopened = ThemeStore::init(FilePreferences::new(&path), ThemePreference::Dark);
        assert_eq!(reopened.get(), Theme::Light);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "light");
    }

    #[test]
    fn test_file_preferences_keep_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::new(dir.path().join(FILE_NAME));
        prefs.set("layout", "grid").unwrap();
        prefs.set(THEME_KEY, "dark").unwrap();
        assert_eq!(prefs.get("layout").as_deref(), Some("grid"));
        assert_eq!(prefs.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_malformed_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        let store = ThemeStore::init(FilePreferences::new(&path), ThemePreference::Light);
        assert_eq!(store.get(), Theme::Light);
    }
}
