//! JSON file-based preference store.
//!
//! All entries live in one human-readable file, rewritten atomically
//! (write-to-temp + rename) after every change so a crash never leaves it
//! half-written.

use crate::domain::error::{Result, TableError};
use crate::storage::backend::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Version of the file format for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file preference store.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "/host/clinic/patients.json": "{\"sort\":{\"column_key\":\"name\",\"direction\":\"ascending\"},\"page_size\":20}"
///   }
/// }
/// ```
///
/// `Send` but not `Sync`; it is owned by the single worker thread.
#[derive(Debug)]
pub struct JsonStore {
    file_path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl JsonStore {
    /// Opens the store at `file_path`, creating parent directories. A missing
    /// file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clinic_table::storage::{JsonStore, PreferenceStore};
    /// use std::path::PathBuf;
    ///
    /// let store = JsonStore::new(PathBuf::from("/tmp/preferences.json"))?;
    /// let prefs = store.load_preferences("patients")?;
    /// # Ok::<(), clinic_table::TableError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening preference store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(entries = data.entries.len(), "preference store opened");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| TableError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, entries = data.entries.len(), "loaded store data");
        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| TableError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "preference store saved");
        Ok(())
    }
}

impl PreferenceStore for JsonStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.data.entries.get(key).cloned();
        tracing::trace!(key = %key, found = value.is_some(), "preference lookup");
        Ok(value)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key).entered();

        if self.data.entries.get(key) == Some(&value) {
            tracing::trace!("value unchanged");
            return Ok(());
        }

        self.data.entries.insert(key.to_string(), value);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let _span = tracing::debug_span!("json_store_remove", key = %key).entered();

        let removed = self.data.entries.remove(key).is_some();
        if removed {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(removed)
    }
}

impl Drop for JsonStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty store on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::ViewPreferences;
    use crate::table::sort::SortSpec;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("nested").join("preferences.json")
    }

    #[test]
    fn preferences_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let prefs = ViewPreferences::new(Some(SortSpec::descending("visit_date")), Some(20));

        {
            let mut store = JsonStore::new(store_path(&dir)).unwrap();
            store.save_preferences("patients", &prefs).unwrap();
        }

        let store = JsonStore::new(store_path(&dir)).unwrap();
        assert_eq!(store.load_preferences("patients").unwrap(), Some(prefs));
        assert_eq!(store.load_preferences("invoices").unwrap(), None);
    }

    #[test]
    fn writes_are_atomic_and_leave_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::new(store_path(&dir)).unwrap();
        store.set("a", "1".to_string()).unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("tmp").exists());

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["version"], 1);
        assert_eq!(on_disk["entries"]["a"], "1");
    }

    #[test]
    fn remove_persists() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonStore::new(store_path(&dir)).unwrap();
        store.set("a", "1".to_string()).unwrap();
        assert!(store.remove("a").unwrap());
        drop(store);

        let store = JsonStore::new(store_path(&dir)).unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonStore::new(path), Err(TableError::Storage(_))));
    }
}
