//! Durable storage for the session collection and the display-mode flag.
//!
//! The collection is stored as a single JSON object mapping session id to
//! session at `${GROVE_HOME}/sessions.json`. Loads are tolerant: a missing or
//! corrupt file yields an empty collection and a log line, never an error.
//! Saves are best-effort atomic writes (temp file + rename).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::warn;

use super::model::Session;
use crate::config::paths;

/// Mapping from session id to session. Display order is always derived by
/// sorting on `updated_at` at call time, never stored.
pub type SessionCollection = HashMap<String, Session>;

/// Display-mode flag persisted alongside the session collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Light => "light",
            DisplayMode::Dark => "dark",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "light" => Ok(DisplayMode::Light),
            "dark" => Ok(DisplayMode::Dark),
            other => Err(format!("Unknown display mode: {other}")),
        }
    }
}

/// Adapter for the files under a Grove home directory.
#[derive(Debug, Clone)]
pub struct Storage {
    home: PathBuf,
}

impl Storage {
    /// Creates a storage adapter rooted at a specific directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Creates a storage adapter rooted at the resolved GROVE_HOME.
    pub fn from_env() -> Self {
        Self::new(paths::grove_home())
    }

    fn sessions_path(&self) -> PathBuf {
        self.home.join("sessions.json")
    }

    fn theme_path(&self) -> PathBuf {
        self.home.join("theme")
    }

    /// Loads the session collection.
    ///
    /// A missing file is a normal first run. A corrupt file is logged and
    /// treated as empty so startup never blocks on bad data.
    pub fn load_sessions(&self) -> SessionCollection {
        let path = self.sessions_path();
        if !path.exists() {
            return SessionCollection::new();
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read session store");
                return SessionCollection::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(collection) => collection,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "session store is corrupt, starting empty");
                SessionCollection::new()
            }
        }
    }

    /// Saves the session collection.
    ///
    /// Callers treat this as best-effort; a failure must not roll back the
    /// in-memory state.
    pub fn save_sessions(&self, collection: &SessionCollection) -> Result<()> {
        let json =
            serde_json::to_string(collection).context("Failed to serialize session collection")?;
        self.write_atomic(&self.sessions_path(), &json)
    }

    /// Loads the display-mode flag, defaulting on missing or corrupt data.
    pub fn load_display_mode(&self) -> DisplayMode {
        let path = self.theme_path();
        if !path.exists() {
            return DisplayMode::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => contents.parse().unwrap_or_else(|e: String| {
                warn!(path = %path.display(), error = %e, "ignoring invalid display mode");
                DisplayMode::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read display mode");
                DisplayMode::default()
            }
        }
    }

    /// Saves the display-mode flag (best-effort).
    pub fn save_display_mode(&self, mode: DisplayMode) -> Result<()> {
        self.write_atomic(&self.theme_path(), mode.as_str())
    }

    /// Writes content atomically via a temp file in the same directory.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.home)
            .with_context(|| format!("Failed to create directory {}", self.home.display()))?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::session::model::Role;

    #[test]
    fn test_load_missing_store_is_empty() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        assert!(storage.load_sessions().is_empty());
    }

    #[test]
    fn test_load_corrupt_store_is_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sessions.json"), "{not json").unwrap();
        let storage = Storage::new(dir.path());

        assert!(storage.load_sessions().is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let mut collection = SessionCollection::new();
        let mut session = Session::new();
        session.push_message(Role::User, "hello");
        session.push_message(Role::Assistant, "hi");
        collection.insert(session.id.clone(), session);

        storage.save_sessions(&collection).unwrap();
        let loaded = storage.load_sessions();
        assert_eq!(collection, loaded);
    }

    #[test]
    fn test_save_creates_home_directory() {
        let dir = tempdir().unwrap();
        let home = dir.path().join("nested").join("grove");
        let storage = Storage::new(&home);

        storage.save_sessions(&SessionCollection::new()).unwrap();
        assert!(home.join("sessions.json").exists());
    }

    #[test]
    fn test_display_mode_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        assert_eq!(storage.load_display_mode(), DisplayMode::Light);
        storage.save_display_mode(DisplayMode::Dark).unwrap();
        assert_eq!(storage.load_display_mode(), DisplayMode::Dark);
    }

    #[test]
    fn test_display_mode_corrupt_falls_back_to_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("theme"), "neon").unwrap();
        let storage = Storage::new(dir.path());

        assert_eq!(storage.load_display_mode(), DisplayMode::Light);
    }

    #[test]
    fn test_display_mode_toggle() {
        assert_eq!(DisplayMode::Light.toggle(), DisplayMode::Dark);
        assert_eq!(DisplayMode::Dark.toggle(), DisplayMode::Light);
    }
}
