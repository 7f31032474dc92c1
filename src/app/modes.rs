//! Input mode state types for the table shell.
//!
//! The shell is either in **Normal** mode, where single keys drive sorting and
//! pagination, or in **Search** mode. Search mode has two focuses: typing into the
//! query, or browsing the filtered results with the query kept.
//!
//! # Example
//!
//! ```rust
//! use clinic_table::app::modes::{InputMode, SearchFocus};
//!
//! let mode = InputMode::Search(SearchFocus::Typing);
//! assert!(mode.is_typing());
//! assert!(!InputMode::Search(SearchFocus::Navigating).is_typing());
//! ```

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the query. Every keystroke re-filters.
    Typing,

    /// The query is kept and keys act as table commands again.
    Navigating,
}

/// Current input handling mode.
///
/// Controls which keybindings are active, whether the search bar is drawn, and
/// the footer hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Table commands: sort, paginate, page size, refresh, print.
    #[default]
    Normal,

    /// Search bar visible, with the given focus.
    Search(SearchFocus),
}

impl InputMode {
    /// Whether printable keys should go into the search query.
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Search(SearchFocus::Typing))
    }

    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search(_))
    }
}
