//! Persistent key-value storage for the theme preference.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ThemeError;

/// A string key-value store that survives across sessions.
///
/// Implementations exist for memory, a JSON file and (with the `web`
/// feature on `wasm32`) the browser's `localStorage`.
pub trait PreferenceStore {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError>;
}

/// In-memory store.
///
/// Clones share the same map, so a caller can keep a handle to inspect what
/// the manager persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Reads a value without going through the trait.
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};

    use tempfile::NamedTempFile;

    use super::PreferenceStore;
    use crate::error::ThemeError;

    /// Store backed by a JSON object on disk (`{"theme": "dark"}`).
    ///
    /// A missing file reads as empty. Writes rewrite the whole file through a
    /// temporary file in the same directory, creating parent directories as
    /// needed. A malformed file fails reads but is replaced by the next write.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        fn load(&self) -> Result<BTreeMap<String, String>, ThemeError> {
            let raw = match fs::read_to_string(&self.path) {
                Ok(raw) => raw,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
                Err(source) => return Err(self.io_error(source)),
            };
            if raw.trim().is_empty() {
                return Ok(BTreeMap::new());
            }
            Ok(serde_json::from_str(&raw)?)
        }

        fn io_error(&self, source: std::io::Error) -> ThemeError {
            ThemeError::Storage {
                path: self.path.clone(),
                source,
            }
        }
    }

    impl PreferenceStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, ThemeError> {
            Ok(self.load()?.remove(key))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError> {
            let mut entries = match self.load() {
                Err(ThemeError::Serialization(err)) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        %err,
                        "overwriting malformed preference file"
                    );
                    BTreeMap::new()
                }
                other => other?,
            };
            entries.insert(key.to_string(), value.to_string());
            let json = serde_json::to_string_pretty(&entries)?;

            let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(parent) => {
                    fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
                    parent
                }
                None => Path::new("."),
            };
            let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
            tmp.write_all(json.as_bytes())
                .map_err(|e| self.io_error(e))?;
            tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip_and_shared_handle() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        assert_eq!(store.get("theme").unwrap(), None);

        writer.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.value("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_memory_store_with_entry() {
        let store = MemoryStore::with_entry("theme", "system");
        assert_eq!(store.value("theme").as_deref(), Some("system"));
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get("theme").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut first = FileStore::new(&path);
        first.set("theme", "dark").unwrap();
        first.set("other", "kept").unwrap();

        let second = FileStore::new(&path);
        assert_eq!(second.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(second.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_store_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("theme"),
            Err(ThemeError::Serialization(_))
        ));
    }

    #[test]
    fn test_file_store_write_replaces_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{\"theme\": ").unwrap();

        let mut store = FileStore::new(&path);
        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"dark\""));
        // only the target file is left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_store_empty_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileStore::new(&path).get("theme").unwrap(), None);
    }

    #[test]
    fn test_file_store_unreadable_path_is_storage_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.get("theme"),
            Err(ThemeError::Storage { .. })
        ));
    }
}
