//! Light/dark display preference, persisted across runs.
//!
//! The preference lives under a single `theme` key. Anything missing or
//! unreadable falls back to [`Theme::Light`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Toggle button glyph: offers the opposite theme
    pub fn glyph(self) -> &'static str {
        match self {
            Theme::Light => "☾",
            Theme::Dark => "☀",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("unknown theme '{0}' (expected 'light' or 'dark')")]
    Unknown(String),

    #[error("failed to write preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the preference is kept.
pub trait ThemePreferenceStore: Send + Sync {
    /// Saved theme, or `Light` when nothing usable is stored
    fn read(&self) -> Theme;
    fn write(&self, theme: Theme) -> Result<(), ThemeError>;
}

/// Preference stored in a JSON file next to other settings.
///
/// Other keys already in the file are left alone.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> serde_json::Map<String, serde_json::Value> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }
}

impl ThemePreferenceStore for FileThemeStore {
    fn read(&self) -> Theme {
        let document = self.load_document();
        match document.get(THEME_KEY).and_then(|v| v.as_str()) {
            Some(value) => value.parse().unwrap_or_else(|err| {
                tracing::warn!(path = %self.path.display(), error = %err, "Ignoring saved theme");
                Theme::default()
            }),
            None => Theme::default(),
        }
    }

    fn write(&self, theme: Theme) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut document = self.load_document();
        document.insert(
            THEME_KEY.to_string(),
            serde_json::Value::String(theme.as_str().to_string()),
        );
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }
}

/// In-memory store, for tests and runs without a state directory.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    theme: Mutex<Option<Theme>>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Mutex::new(Some(theme)),
        }
    }
}

impl ThemePreferenceStore for MemoryThemeStore {
    fn read(&self) -> Theme {
        self.theme
            .lock()
            .ok()
            .and_then(|t| *t)
            .unwrap_or_default()
    }

    fn write(&self, theme: Theme) -> Result<(), ThemeError> {
        match self.theme.lock() {
            Ok(mut slot) => *slot = Some(theme),
            Err(poisoned) => *poisoned.into_inner() = Some(theme),
        }
        Ok(())
    }
}

/// Owner of the toggle control: reads the saved theme once, then flips and
/// persists it on each toggle.
pub struct ThemeToggle {
    store: Box<dyn ThemePreferenceStore>,
    current: Theme,
}

impl ThemeToggle {
    pub fn new(store: Box<dyn ThemePreferenceStore>) -> Self {
        let current = store.read();
        tracing::debug!(theme = %current, "Applied saved theme");
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Switch to the other theme. The new theme applies even if saving fails.
    pub fn toggle(&mut self) -> Result<Theme, ThemeError> {
        self.set(self.current.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> Result<Theme, ThemeError> {
        self.current = theme;
        self.store.write(theme)?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_theme() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(ThemeError::Unknown(s)) if s == "sepia"
        ));
    }

    #[test]
    fn test_toggled_and_glyph() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.glyph(), "☀");
        assert_eq!(Theme::Light.glyph(), "☾");
    }

    #[test]
    fn test_file_store_defaults_to_light() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileThemeStore::new(temp_dir.path().join("preferences.json"));
        assert_eq!(store.read(), Theme::Light);
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("preferences.json");
        let store = FileThemeStore::new(&path);

        store.write(Theme::Dark).unwrap();
        assert_eq!(store.read(), Theme::Dark);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        fs::write(&path, r#"{"language":"ko"}"#).unwrap();

        FileThemeStore::new(&path).write(Theme::Dark).unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["language"], "ko");
        assert_eq!(document["theme"], "dark");
    }

    #[test]
    fn test_file_store_ignores_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        fs::write(&path, "not json").unwrap();
        assert_eq!(FileThemeStore::new(&path).read(), Theme::Light);

        fs::write(&path, r#"{"theme":"sepia"}"#).unwrap();
        assert_eq!(FileThemeStore::new(&path).read(), Theme::Light);
    }

    #[test]
    fn test_toggle_applies_saved_theme_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        FileThemeStore::new(&path).write(Theme::Dark).unwrap();

        let mut toggle = ThemeToggle::new(Box::new(FileThemeStore::new(&path)));
        assert_eq!(toggle.current(), Theme::Dark);

        assert_eq!(toggle.toggle().unwrap(), Theme::Light);
        assert_eq!(FileThemeStore::new(&path).read(), Theme::Light);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryThemeStore::new();
        assert_eq!(store.read(), Theme::Light);
        store.write(Theme::Dark).unwrap();
        assert_eq!(store.read(), Theme::Dark);

        let mut toggle = ThemeToggle::new(Box::new(MemoryThemeStore::with_theme(Theme::Dark)));
        assert_eq!(toggle.current(), Theme::Dark);
        toggle.set(Theme::Dark).unwrap();
        assert_eq!(toggle.current(), Theme::Dark);
    }
}
