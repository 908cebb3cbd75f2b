//! Light/dark display preference with best-effort durable storage.
//!
//! The preference lives under a single key ([`DISPLAY_MODE_KEY`]) holding a
//! JSON boolean. Reading never fails from the caller's point of view: an
//! absent, unreadable or corrupt value means light mode. Write failures are
//! logged and otherwise ignored.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

/// Storage key of the display preference.
pub const DISPLAY_MODE_KEY: &str = "darkMode";

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl DisplayMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            DisplayMode::Dark
        } else {
            DisplayMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == DisplayMode::Dark
    }

    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }
}

// ---------------------------------------------------------------------------
// Key/value storage
// ---------------------------------------------------------------------------

/// Durable key/value storage for raw JSON-encoded preference values.
pub trait PreferenceStore: Send {
    /// Raw JSON text stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store raw JSON text under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept in one JSON object file.
///
/// Writes go to a sibling temp file which is synced and renamed over the
/// target, so readers never observe a partial file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, details: impl ToString) -> CatalogError {
        CatalogError::PersistenceRead {
            path: self.path.clone(),
            details: details.to_string(),
        }
    }

    fn write_error(&self, details: impl ToString) -> CatalogError {
        CatalogError::PersistenceWrite {
            path: self.path.clone(),
            details: details.to_string(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.read_error(e)),
        };
        serde_json::from_str(&content).map_err(|e| self.read_error(e))
    }

    fn save_all(&self, entries: &BTreeMap<String, Value>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)
    }
}

impl PreferenceStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).map(Value::to_string))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let value: Value = serde_json::from_str(value).map_err(|e| self.write_error(e))?;
        // A corrupt file is replaced rather than blocking the write.
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value);
        self.save_all(&entries).map_err(|e| self.write_error(e))
    }
}

/// Process-lifetime storage, used when no preferences file is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// The in-memory display mode plus the store it is mirrored to.
pub struct DisplayModePersistence {
    store: Box<dyn PreferenceStore>,
    mode: DisplayMode,
}

impl DisplayModePersistence {
    /// Read the stored preference, defaulting to light on any problem.
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let mode = match store.read(DISPLAY_MODE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<bool>(&raw) {
                Ok(dark) => DisplayMode::from_dark(dark),
                Err(e) => {
                    warn!(value = %raw, error = %e, "ignoring unparseable display mode");
                    DisplayMode::Light
                }
            },
            Ok(None) => DisplayMode::Light,
            Err(e) => {
                warn!(error = %e, "display mode unreadable, using light");
                DisplayMode::Light
            }
        };
        debug!(?mode, "display mode loaded");
        Self { store, mode }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Flip the mode and persist it. Returns the new mode.
    pub fn toggle(&mut self) -> DisplayMode {
        self.mode = self.mode.toggled();
        let encoded = if self.mode.is_dark() { "true" } else { "false" };
        if let Err(e) = self.store.write(DISPLAY_MODE_KEY, encoded) {
            warn!(error = %e, "display mode not persisted");
        }
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(CatalogError::PersistenceRead {
                path: PathBuf::from("/dev/null"),
                details: "broken".into(),
            })
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(CatalogError::PersistenceWrite {
                path: PathBuf::from("/dev/null"),
                details: "broken".into(),
            })
        }
    }

    #[test]
    fn absent_value_is_light() {
        let display = DisplayModePersistence::load(Box::new(MemoryStore::new()));
        assert_eq!(display.mode(), DisplayMode::Light);
    }

    #[test]
    fn unparseable_value_is_light() {
        let mut store = MemoryStore::new();
        store.write(DISPLAY_MODE_KEY, "\"dark\"").unwrap();
        let display = DisplayModePersistence::load(Box::new(store));
        assert_eq!(display.mode(), DisplayMode::Light);
    }

    #[test]
    fn broken_store_degrades_quietly() {
        let mut display = DisplayModePersistence::load(Box::new(BrokenStore));
        assert_eq!(display.mode(), DisplayMode::Light);
        assert_eq!(display.toggle(), DisplayMode::Dark);
        assert_eq!(display.mode(), DisplayMode::Dark);
    }

    #[test]
    fn toggle_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let mut display = DisplayModePersistence::load(Box::new(JsonFileStore::new(&path)));
        assert_eq!(display.toggle(), DisplayMode::Dark);
        assert!(fs::read_to_string(&path).unwrap().contains("\"darkMode\": true"));

        let display = DisplayModePersistence::load(Box::new(JsonFileStore::new(&path)));
        assert_eq!(display.mode(), DisplayMode::Dark);
    }

    #[test]
    fn corrupt_file_reads_light_and_is_repaired_on_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not valid json {{{").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.read(DISPLAY_MODE_KEY),
            Err(CatalogError::PersistenceRead { .. })
        ));

        let mut display = DisplayModePersistence::load(Box::new(store));
        assert_eq!(display.mode(), DisplayMode::Light);
        display.toggle();

        let reloaded = JsonFileStore::new(&path);
        assert_eq!(reloaded.read(DISPLAY_MODE_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{ "lastCategory": "home" }"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        store.write(DISPLAY_MODE_KEY, "false").unwrap();
        assert_eq!(store.read("lastCategory").unwrap().as_deref(), Some("\"home\""));
        assert_eq!(store.read(DISPLAY_MODE_KEY).unwrap().as_deref(), Some("false"));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
