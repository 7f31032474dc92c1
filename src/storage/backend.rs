//! Preference store abstraction.
//!
//! The table shell remembers nothing between mounts. A caller that wants a view
//! to reopen with the same sort and page size keeps [`ViewPreferences`] in a
//! [`PreferenceStore`] and passes them back on the next mount. The trait keeps the
//! backend injectable, so tests use [`MemoryStore`] and the plugin worker uses
//! [`JsonStore`].
//!
//! [`MemoryStore`]: crate::storage::MemoryStore
//! [`JsonStore`]: crate::storage::JsonStore

use crate::domain::error::{Result, TableError};
use crate::storage::models::ViewPreferences;

/// Keyed string storage for view preferences.
///
/// # Examples
///
/// ```
/// use clinic_table::storage::{MemoryStore, PreferenceStore, ViewPreferences};
/// use clinic_table::SortSpec;
///
/// let mut store = MemoryStore::default();
/// let prefs = ViewPreferences::new(Some(SortSpec::ascending("name")), Some(20));
/// store.save_preferences("patients", &prefs)?;
/// assert_eq!(store.load_preferences("patients")?, Some(prefs));
/// assert_eq!(store.load_preferences("invoices")?, None);
/// # Ok::<(), clinic_table::TableError>(())
/// ```
pub trait PreferenceStore: Send {
    /// Returns the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Returns whether a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// Reads and decodes the preferences stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Storage`] if the stored value is not valid
    /// preferences JSON.
    fn load_preferences(&self, key: &str) -> Result<Option<ViewPreferences>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| TableError::Storage(format!("invalid preferences under '{key}': {e}")))
    }

    /// Encodes and stores `preferences` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save_preferences(&mut self, key: &str, preferences: &ViewPreferences) -> Result<()> {
        let raw = serde_json::to_string(preferences)?;
        self.set(key, raw)
    }
}
