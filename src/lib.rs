//! clinic-table: a sortable, filterable, paginated data table for clinic
//! listings (patients, visits, invoices, inventory), shipped as a Zellij plugin.
//!
//! - Declarative columns with plain, badge, link or custom cells
//! - Global case-insensitive search across every column, with match highlighting
//! - Click or key driven three-state column sorting (none → asc → desc → none)
//! - Client-side pagination with a page-size selector
//! - Remembered sort and page size per table view
//! - Plain-text reports of the filtered and sorted rows for printing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Presentation shell
//! │  - Event handling                                   │
//! │  - View state (query, sort, page)                   │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Table Engine  │   │ UI Layer      │   │ Worker Layer  │
//! │ (table/)      │   │ (ui/)         │   │ (worker/)     │
//! │ - Columns     │   │ - Rendering   │   │ - File I/O    │
//! │ - Filter      │   │ - Theming     │   │ - Preferences │
//! │ - Sort        │   │ - Reports     │   │ - IPC bridge  │
//! │ - Paginate    │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Storage & Infrastructure Layers            │
//! │  - Records and errors (domain/)                     │
//! │  - Preference stores (storage/)                     │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Logging (observability/)                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is pure and synchronous: every change to the query, sort, page
//! size or rows runs `filter → sort` again and clamps the page index, so an
//! out-of-range page is never displayed.
//!
//! # Example
//!
//! ```rust
//! use clinic_table::{filter, paginate, sort, ColumnDef, Record, SortDirection};
//!
//! let rows = vec![
//!     Record::new().with("name", "John Doe").with("age", 42),
//!     Record::new().with("name", "Mary Jane").with("age", 29),
//!     Record::new().with("name", "Jolene Smith").with("age", 35),
//! ];
//! let columns = vec![ColumnDef::new("name", "Name"), ColumnDef::new("age", "Age")];
//!
//! let matched = filter(&rows, &columns, "jo");
//! let sorted = sort(matched, &columns[1], SortDirection::Descending);
//! let page = paginate(&sorted, 0, 10);
//!
//! let names: Vec<&str> = page.rows.iter().filter_map(|r| r.value("name").as_str()).collect();
//! assert_eq!(names, vec!["John Doe", "Jolene Smith"]);
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod table;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, Event, InputMode, SearchFocus, TableProps, TableState};
pub use domain::{display_string, load_rows, parse_rows, Record, Result, TableError};
pub use table::column::{
    columns_from_toml, infer_columns, load_column_specs, parse_column_specs, Cell, CellFormat,
    ColumnDef, ColumnKind, ColumnSpec,
};
pub use table::{filter, paginate, sort, ClampPolicy, MatchMode, Page, Pagination, SortDirection, SortSpec};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::str::FromStr;
use table::paginate::DEFAULT_PAGE_SIZE_OPTIONS;

/// Plugin configuration parsed from the Zellij layout.
///
/// ```kdl
/// plugin location="file:clinic-table.wasm" {
///     rows_file "~/clinic/patients.json"
///     columns_file "~/clinic/patients.toml"
///     title "Patients"
///     page_sizes "10,25,50"
///     initial_sort "visit_date:desc"
///     printable "true"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON array of row objects. Without it the table starts empty.
    pub rows_file: Option<String>,

    /// TOML column definitions. Without it columns follow the first row's keys.
    pub columns_file: Option<String>,

    /// Default: `"Records"`.
    pub title: String,

    /// Default: `"No records found."`.
    pub empty_message: String,

    /// Forced page size. Wins over the page-size options and remembered sizes.
    pub page_size: Option<usize>,

    /// Page-size selector choices. Default: 10, 20, 30, 40, 50.
    pub page_sizes: Vec<usize>,

    pub initial_sort: Option<SortSpec>,

    pub match_mode: MatchMode,

    pub clamp_policy: ClampPolicy,

    /// Whether `r` asks for the rows file to be reloaded.
    pub refreshable: bool,

    /// Whether `P` writes a report to `report_file`.
    pub printable: bool,

    /// Built-in theme name: `clinic-dark` or `clinic-light`. Ignored if
    /// `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    pub theme_file: Option<String>,

    /// Log level: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`.
    pub trace_level: Option<String>,

    /// Where printed reports go. Default: `report.txt` in the data directory.
    pub report_file: Option<String>,

    /// Whether sort and page size are stored and restored per view.
    /// Default: `true`.
    pub remember_preferences: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows_file: None,
            columns_file: None,
            title: "Records".to_string(),
            empty_message: "No records found.".to_string(),
            page_size: None,
            page_sizes: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            initial_sort: None,
            match_mode: MatchMode::default(),
            clamp_policy: ClampPolicy::default(),
            refreshable: true,
            printable: true,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            report_file: None,
            remember_preferences: true,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Invalid values are logged and replaced by their defaults, so a typo in a
    /// layout never prevents the plugin from loading.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use clinic_table::{Config, SortSpec};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("rows_file".to_string(), "~/clinic/patients.json".to_string());
    /// map.insert("page_sizes".to_string(), "25, 10, 50".to_string());
    /// map.insert("initial_sort".to_string(), "name:desc".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.rows_file.as_deref(), Some("/host/clinic/patients.json"));
    /// assert_eq!(config.page_sizes, vec![10, 25, 50]);
    /// assert_eq!(config.initial_sort, Some(SortSpec::descending("name")));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let path = |key: &str| text(key).map(|p| infrastructure::resolve_user_path(&p));

        let page_sizes = text("page_sizes")
            .and_then(|s| parse_page_sizes(&s).map_err(|e| tracing::warn!(error = %e, "ignoring page_sizes")).ok())
            .unwrap_or(defaults.page_sizes);

        Self {
            rows_file: path("rows_file"),
            columns_file: path("columns_file"),
            title: text("title").unwrap_or(defaults.title),
            empty_message: text("empty_message").unwrap_or(defaults.empty_message),
            page_size: parse_option(config, "page_size").filter(|&size: &usize| size > 0),
            page_sizes,
            initial_sort: parse_option(config, "initial_sort"),
            match_mode: parse_option(config, "match_mode").unwrap_or(defaults.match_mode),
            clamp_policy: parse_option(config, "clamp_policy").unwrap_or(defaults.clamp_policy),
            refreshable: parse_option(config, "refreshable").unwrap_or(defaults.refreshable),
            printable: parse_option(config, "printable").unwrap_or(defaults.printable),
            theme_name: text("theme"),
            theme_file: path("theme_file"),
            trace_level: text("trace_level"),
            report_file: path("report_file"),
            remember_preferences: parse_option(config, "remember_preferences")
                .unwrap_or(defaults.remember_preferences),
        }
    }

    /// Table props for this configuration. Rows and columns arrive later from
    /// the worker; until then the table shows its loading state.
    #[must_use]
    pub fn table_props(&self) -> TableProps {
        TableProps {
            title: self.title.clone(),
            empty_message: self.empty_message.clone(),
            initial_sort: self.initial_sort.clone(),
            forced_page_size: self.page_size,
            page_size_options: self.page_sizes.clone(),
            refreshable: self.refreshable && self.rows_file.is_some(),
            printable: self.printable,
            match_mode: self.match_mode,
            clamp_policy: self.clamp_policy,
            loading: self.rows_file.is_some(),
            ..TableProps::default()
        }
    }

    /// Store key of this table view's remembered preferences.
    #[must_use]
    pub fn preferences_key(&self) -> String {
        self.rows_file.clone().unwrap_or_else(|| self.title.clone())
    }

    /// Destination of printed reports.
    #[must_use]
    pub fn report_path(&self) -> String {
        self.report_file.clone().unwrap_or_else(|| {
            infrastructure::get_data_dir()
                .join("report.txt")
                .to_string_lossy()
                .into_owned()
        })
    }

    /// Resolves the configured theme, falling back to `clinic-dark`.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Parses a comma separated list of page sizes, sorted and deduplicated.
///
/// # Errors
///
/// Returns [`TableError::Config`] if an entry is not a positive integer or the
/// list is empty.
pub fn parse_page_sizes(s: &str) -> Result<Vec<usize>> {
    let mut sizes = s
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| match p.parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(TableError::Config(format!("invalid page size '{p}'"))),
        })
        .collect::<Result<Vec<usize>>>()?;

    if sizes.is_empty() {
        return Err(TableError::Config("page_sizes must not be empty".to_string()));
    }
    sizes.sort_unstable();
    sizes.dedup();
    Ok(sizes)
}

fn parse_option<T>(config: &BTreeMap<String, String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = config.get(key)?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse()
        .map_err(|e| tracing::warn!(key = %key, value = %raw, error = %e, "ignoring invalid option"))
        .ok()
}

/// Builds the initial table state for a configuration.
///
/// # Example
///
/// ```rust
/// use clinic_table::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert_eq!(state.title, "Records");
/// assert_eq!(state.pagination.page_size, 10);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> TableState {
    tracing::debug!(title = %config.title, rows_file = ?config.rows_file, "initializing table");
    TableState::new(config.table_props(), config.theme())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        let config = Config::from_zellij(&BTreeMap::new());
        assert_eq!(config.title, "Records");
        assert_eq!(config.page_sizes, vec![10, 20, 30, 40, 50]);
        assert!(config.remember_preferences);
        assert_eq!(config.preferences_key(), "Records");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("page_size", "zero"),
            ("page_sizes", "10,abc"),
            ("match_mode", "regex"),
            ("printable", "maybe"),
        ]));
        assert_eq!(config.page_size, None);
        assert_eq!(config.page_sizes, DEFAULT_PAGE_SIZE_OPTIONS.to_vec());
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert!(config.printable);
    }

    #[test]
    fn parses_every_option() {
        let config = Config::from_zellij(&map(&[
            ("rows_file", "/data/visits.json"),
            ("title", "Visits"),
            ("page_size", "25"),
            ("match_mode", "fuzzy"),
            ("clamp_policy", "last"),
            ("refreshable", "false"),
            ("theme", "clinic-light"),
            ("report_file", "~/visits.txt"),
            ("remember_preferences", "false"),
        ]));
        assert_eq!(config.page_size, Some(25));
        assert_eq!(config.match_mode, MatchMode::Fuzzy);
        assert_eq!(config.clamp_policy, ClampPolicy::LastValid);
        assert!(!config.refreshable);
        assert_eq!(config.theme().name, "clinic-light");
        assert_eq!(config.report_path(), "/host/visits.txt");
        assert!(!config.remember_preferences);
        assert_eq!(config.preferences_key(), "/data/visits.json");

        let state = initialize(&config);
        assert_eq!(state.title, "Visits");
        assert_eq!(state.pagination.page_size, 25);
        assert!(state.loading);
        assert!(!state.refreshable);
    }

    #[test]
    fn page_sizes_are_validated() {
        assert_eq!(parse_page_sizes("50, 10,10").unwrap(), vec![10, 50]);
        assert!(matches!(parse_page_sizes("0"), Err(TableError::Config(_))));
        assert!(matches!(parse_page_sizes(" , "), Err(TableError::Config(_))));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("neon".to_string()),
            ..Config::default()
        };
        assert_eq!(config.theme().name, "clinic-dark");
    }
}
