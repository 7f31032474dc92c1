//! Side effects requested by the table shell.
//!
//! The shell owns no I/O. When the user asks for something that needs the outside
//! world (closing the pane, reloading rows, printing, remembering preferences),
//! [`handle_event`](crate::app::handle_event) returns an [`Action`] and the plugin
//! runtime decides how to carry it out.
//!
//! # Example
//!
//! ```rust
//! use clinic_table::app::Action;
//!
//! let actions = vec![Action::Refresh, Action::CloseFocus];
//! assert!(actions.contains(&Action::Refresh));
//! ```

use crate::storage::models::ViewPreferences;

/// Commands executed by the plugin runtime after an event is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// The caller should reload the rows. Only emitted when the table was built
    /// with `refreshable` set.
    Refresh,

    /// The caller should print or save `report`. Only emitted when the table was
    /// built with `printable` set.
    Print {
        /// Plain-text rendering of every filtered and sorted row.
        report: String,
    },

    /// The sort or page size changed. The caller may persist these and pass them
    /// back as the initial sort and page size on the next mount.
    PersistPreferences(ViewPreferences),
}
