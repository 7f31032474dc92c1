//! Worker message types for cross-thread communication.
//!
//! The plugin thread never touches the filesystem itself. It posts a
//! [`WorkerMessage`] to the background worker and receives a [`WorkerResponse`]
//! as a custom message. Both travel as JSON.

use crate::domain::record::Record;
use crate::storage::models::ViewPreferences;
use crate::table::column::ColumnSpec;
use serde::{Deserialize, Serialize};

/// Generates convenience constructors for `WorkerMessage` variants.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_rows(LoadRows { path: String }),
    load_columns(LoadColumns { path: String }),
    load_preferences(LoadPreferences { key: String }),
    save_preferences(SavePreferences { key: String, preferences: ViewPreferences }),
    write_report(WriteReport { path: String, report: String }),
}

/// Messages sent from the plugin thread to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read a JSON array of row objects.
    LoadRows { path: String },

    /// Read a TOML column definition document.
    LoadColumns { path: String },

    /// Look up the remembered sort and page size of one table view.
    LoadPreferences {
        /// Store key identifying the table view.
        key: String,
    },

    /// Remember the sort and page size of one table view.
    SavePreferences {
        key: String,
        preferences: ViewPreferences,
    },

    /// Write a printable report to a file, replacing it.
    WriteReport { path: String, report: String },
}

impl WorkerMessage {
    /// Short name of the message kind, for span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadRows { .. } => "load_rows",
            Self::LoadColumns { .. } => "load_columns",
            Self::LoadPreferences { .. } => "load_preferences",
            Self::SavePreferences { .. } => "save_preferences",
            Self::WriteReport { .. } => "write_report",
        }
    }
}

/// Responses sent from the worker back to the plugin thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    RowsLoaded {
        rows: Vec<Record>,
    },

    ColumnsLoaded {
        columns: Vec<ColumnSpec>,
    },

    /// `None` when nothing was stored under the key yet.
    PreferencesLoaded {
        preferences: Option<ViewPreferences>,
    },

    PreferencesSaved {
        key: String,
    },

    ReportWritten {
        path: String,
    },

    /// The operation failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}
