//! Worker thread implementation for file I/O.
//!
//! Runs on a separate thread spawned by Zellij, so reading a large rows file or
//! writing a report never blocks rendering. Every message is answered with
//! exactly one [`WorkerResponse`]; failures become [`WorkerResponse::Error`].

use crate::domain::error::{Result, TableError};
use crate::domain::record::load_rows;
use crate::infrastructure::paths;
use crate::storage::{JsonStore, PreferenceStore, ViewPreferences};
use crate::table::column::load_column_specs;
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Name of the preference store file inside the plugin data directory.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Worker state. The preference store is opened lazily on first use.
#[derive(Serialize, Deserialize, Default)]
pub struct TableWorker {
    #[serde(skip)]
    store: Option<Box<dyn PreferenceStore>>,
}

impl TableWorker {
    /// Creates a worker backed by the given store.
    #[must_use]
    pub fn with_store(store: Box<dyn PreferenceStore>) -> Self {
        Self { store: Some(store) }
    }

    fn get_store(&mut self) -> Result<&mut Box<dyn PreferenceStore>> {
        if self.store.is_none() {
            let path = paths::get_data_dir().join(PREFERENCES_FILE_NAME);
            let store = JsonStore::new(path)
                .map_err(|e| TableError::Worker(format!("failed to open preference store: {e}")))?;
            self.store = Some(Box::new(store));
        }

        self.store
            .as_mut()
            .ok_or_else(|| TableError::Worker("preference store not initialized".to_string()))
    }

    /// Standardizes logging and error conversion across operations.
    fn handle_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "worker operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_load_rows(path: &str) -> WorkerResponse {
        Self::handle_result("load rows", load_rows(path), |rows| {
            tracing::debug!(row_count = rows.len(), "rows loaded");
            WorkerResponse::RowsLoaded { rows }
        })
    }

    fn handle_load_columns(path: &str) -> WorkerResponse {
        Self::handle_result("load columns", load_column_specs(path), |columns| {
            WorkerResponse::ColumnsLoaded { columns }
        })
    }

    fn handle_load_preferences(&mut self, key: &str) -> WorkerResponse {
        Self::handle_result(
            "load preferences",
            self.get_store().and_then(|store| store.load_preferences(key)),
            |preferences| {
                tracing::debug!(key = %key, found = preferences.is_some(), "preferences loaded");
                WorkerResponse::PreferencesLoaded { preferences }
            },
        )
    }

    fn handle_save_preferences(&mut self, key: String, preferences: &ViewPreferences) -> WorkerResponse {
        Self::handle_result(
            "save preferences",
            self.get_store()
                .and_then(|store| store.save_preferences(&key, preferences)),
            |()| WorkerResponse::PreferencesSaved { key },
        )
    }

    fn handle_write_report(path: String, report: &str) -> WorkerResponse {
        Self::handle_result("write report", write_report(Path::new(&path), report), |()| {
            tracing::debug!(path = %path, bytes = report.len(), "report written");
            WorkerResponse::ReportWritten { path }
        })
    }

    /// Processes one message and returns its response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadRows { path } => Self::handle_load_rows(&path),
            WorkerMessage::LoadColumns { path } => Self::handle_load_columns(&path),
            WorkerMessage::LoadPreferences { key } => self.handle_load_preferences(&key),
            WorkerMessage::SavePreferences { key, preferences } => {
                self.handle_save_preferences(key, &preferences)
            }
            WorkerMessage::WriteReport { path, report } => Self::handle_write_report(path, &report),
        }
    }
}

fn write_report(path: &Path, report: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, report)?;
    Ok(())
}

/// Initializes tracing for the worker thread, writing to the same log file as
/// the plugin.
fn init_worker_tracing() {
    use crate::observability;
    use crate::Config;

    let config = Config::default();
    observability::init_tracing(&config);
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for TableWorker {
    /// Deserializes the payload, handles it, and posts the response back under
    /// the same message name.
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
        }

        let response = match serde_json::from_str::<WorkerMessage>(&payload) {
            Ok(worker_message) => self.handle_message(worker_message),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    message: format!("invalid worker message: {e}"),
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(payload) => {
                post_message_to_plugin(PluginMessage {
                    name: message,
                    payload,
                    worker_name: None,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker response");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::table::sort::SortSpec;
    use tempfile::TempDir;

    fn worker() -> TableWorker {
        TableWorker::with_store(Box::new(MemoryStore::default()))
    }

    #[test]
    fn loads_rows_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.json");
        std::fs::write(&path, r#"[{"name": "John Doe"}, {"name": "Mary Jane"}]"#).unwrap();

        let response = worker().handle_message(WorkerMessage::load_rows(path.to_string_lossy().into_owned()));
        let WorkerResponse::RowsLoaded { rows } = response else {
            panic!("expected RowsLoaded, got {response:?}");
        };
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn missing_rows_file_is_an_error_response() {
        let response = worker().handle_message(WorkerMessage::load_rows("/nonexistent/rows.json".to_string()));
        assert!(matches!(response, WorkerResponse::Error { ref message } if message.starts_with("load rows")));
    }

    #[test]
    fn loads_columns_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("columns.toml");
        std::fs::write(&path, "[[columns]]\nkey = \"budget\"\nkind = \"number\"\n").unwrap();

        let response = worker().handle_message(WorkerMessage::load_columns(path.to_string_lossy().into_owned()));
        let WorkerResponse::ColumnsLoaded { columns } = response else {
            panic!("expected ColumnsLoaded, got {response:?}");
        };
        assert_eq!(columns[0].key, "budget");
    }

    #[test]
    fn preferences_round_trip_through_store() {
        let mut worker = worker();
        let prefs = ViewPreferences::new(Some(SortSpec::ascending("name")), Some(30));

        assert_eq!(
            worker.handle_message(WorkerMessage::save_preferences("patients".to_string(), prefs.clone())),
            WorkerResponse::PreferencesSaved { key: "patients".to_string() }
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::load_preferences("patients".to_string())),
            WorkerResponse::PreferencesLoaded { preferences: Some(prefs) }
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::load_preferences("visits".to_string())),
            WorkerResponse::PreferencesLoaded { preferences: None }
        );
    }

    #[test]
    fn writes_report_creating_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.txt");
        let path_str = path.to_string_lossy().into_owned();

        let response = worker().handle_message(WorkerMessage::write_report(path_str.clone(), "Patients\n".to_string()));
        assert_eq!(response, WorkerResponse::ReportWritten { path: path_str });
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Patients\n");
    }
}
