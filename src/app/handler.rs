//! Event handling and state transition logic.
//!
//! The plugin runtime translates keys, mouse clicks and worker responses into
//! [`Event`]s. [`handle_event`] applies each one to the [`TableState`] and
//! returns whether a re-render is needed together with the side effects to run.
//!
//! ```text
//! Key / Mouse / Worker → Event → handle_event → (render?, Vec<Action>)
//! ```
//!
//! # Example
//!
//! ```rust
//! use clinic_table::app::{handle_event, Action, Event, TableProps, TableState};
//! use clinic_table::{ColumnDef, Record, SortSpec, Theme};
//!
//! let rows = vec![Record::new().with("name", "Mary"), Record::new().with("name", "Arjun")];
//! let props = TableProps::new(rows, vec![ColumnDef::new("name", "Name")]);
//! let mut state = TableState::new(props, Theme::default());
//!
//! let (render, actions) = handle_event(&mut state, &Event::SortColumn(0))?;
//! assert!(render);
//! assert!(matches!(&actions[..], [Action::PersistPreferences(p)] if p.sort == Some(SortSpec::ascending("name"))));
//! # Ok::<(), clinic_table::TableError>(())
//! ```

use super::modes::{InputMode, SearchFocus};
use crate::app::{Action, TableState};
use crate::domain::error::Result;
use crate::domain::record::Record;
use crate::table::column::ColumnSpec;
use crate::worker::WorkerResponse;

/// Events triggered by user input or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Opens the search bar with typing focus, keeping any existing query.
    SearchMode,
    /// Returns keystrokes to the query.
    FocusSearchBar,
    /// Keeps the query and returns keys to table commands. Leaves search mode
    /// entirely when the query is empty.
    FocusResults,
    /// Clears the query and closes the search bar.
    ExitSearch,
    /// Appends a character to the query (typing focus only).
    Char(char),
    /// Removes the last query character (typing focus only).
    Backspace,

    FocusNextColumn,
    FocusPreviousColumn,
    /// Cycles the sort of the focused column.
    SortFocusedColumn,
    /// Cycles the sort of the column at this index (header click, digit key).
    SortColumn(usize),

    /// Scrolls the body one row down, moving to the next page from the
    /// bottom of the current one.
    ScrollDown,
    /// Scrolls the body one row up, moving to the bottom of the previous page
    /// from the top of the current one.
    ScrollUp,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    /// Next larger page-size option.
    NextPageSize,
    /// Next smaller page-size option.
    PreviousPageSize,
    /// Page-size selector set to a specific size.
    SetPageSize(usize),
    /// The caller changed its forced page size.
    SetForcedPageSize(Option<usize>),

    Refresh,
    Print,
    CloseFocus,

    /// The caller replaced the rows.
    RowsChanged(Vec<Record>),
    /// The caller replaced the column definitions.
    ColumnsChanged(Vec<ColumnSpec>),

    /// Wraps a response from the background worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates the table state, and returns
/// `(needs_render, actions)`.
///
/// Sort and page-size changes emit [`Action::PersistPreferences`]. Refresh and
/// print emit their actions only when the table was built with `refreshable`
/// or `printable`.
///
/// # Errors
///
/// Currently infallible. The `Result` keeps room for events whose handling
/// needs I/O.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut TableState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind(event)).entered();

    let had_status = state.status.take().is_some();

    let (render, actions) = match event {
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            (true, vec![])
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            (true, vec![])
        }
        Event::FocusResults => {
            state.input_mode = if state.search_query.is_empty() {
                InputMode::Normal
            } else {
                InputMode::Search(SearchFocus::Navigating)
            };
            (true, vec![])
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.clear_query();
            (true, vec![])
        }
        Event::Char(c) => {
            if !state.input_mode.is_typing() {
                return Ok((had_status, vec![]));
            }
            state.push_query_char(*c);
            (true, vec![])
        }
        Event::Backspace => {
            if !state.input_mode.is_typing() {
                return Ok((had_status, vec![]));
            }
            (state.pop_query_char(), vec![])
        }

        Event::FocusNextColumn => (state.focus_next_column(), vec![]),
        Event::FocusPreviousColumn => (state.focus_previous_column(), vec![]),
        Event::SortFocusedColumn => {
            let column = state.focused_column;
            sort_column(state, column)
        }
        Event::SortColumn(column) => sort_column(state, *column),

        Event::ScrollDown => (state.scroll_down() || state.next_page(), vec![]),
        Event::ScrollUp => {
            if state.scroll_up() {
                (true, vec![])
            } else if state.previous_page() {
                state.scroll_to_bottom();
                (true, vec![])
            } else {
                (false, vec![])
            }
        }
        Event::NextPage => (state.next_page(), vec![]),
        Event::PreviousPage => (state.previous_page(), vec![]),
        Event::FirstPage => (state.first_page(), vec![]),
        Event::LastPage => (state.last_page(), vec![]),
        Event::NextPageSize => page_size_changed(state, |s| s.cycle_page_size(true)),
        Event::PreviousPageSize => page_size_changed(state, |s| s.cycle_page_size(false)),
        Event::SetPageSize(size) => page_size_changed(state, |s| s.set_page_size(*size)),
        Event::SetForcedPageSize(size) => (state.set_forced_page_size(*size), vec![]),

        Event::Refresh => {
            if state.refreshable {
                tracing::debug!("refresh requested");
                (false, vec![Action::Refresh])
            } else {
                (false, vec![])
            }
        }
        Event::Print => {
            if state.printable {
                tracing::debug!(rows = state.visible_len(), "print requested");
                (false, vec![Action::Print { report: state.report() }])
            } else {
                (false, vec![])
            }
        }
        Event::CloseFocus => (false, vec![Action::CloseFocus]),

        Event::RowsChanged(rows) => {
            state.set_rows(rows.clone());
            (true, vec![])
        }
        Event::ColumnsChanged(specs) => {
            state.set_columns(specs.iter().map(ColumnSpec::to_column).collect());
            (true, vec![])
        }

        Event::WorkerResponse(response) => handle_worker_response(state, response),
    };

    Ok((render || had_status, actions))
}

fn sort_column(state: &mut TableState, column: usize) -> (bool, Vec<Action>) {
    if state.cycle_sort(column) {
        (true, vec![Action::PersistPreferences(state.preferences())])
    } else {
        (false, vec![])
    }
}

fn page_size_changed<F>(state: &mut TableState, change: F) -> (bool, Vec<Action>)
where
    F: FnOnce(&mut TableState) -> bool,
{
    if change(state) {
        tracing::debug!(page_size = state.pagination.page_size, "page size changed");
        (true, vec![Action::PersistPreferences(state.preferences())])
    } else {
        (false, vec![])
    }
}

fn handle_worker_response(state: &mut TableState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::RowsLoaded { rows } => {
            if !state.loading && &state.rows == rows {
                tracing::debug!("rows unchanged, skipping render");
                return (false, vec![]);
            }
            state.set_rows(rows.clone());
            (true, vec![])
        }
        WorkerResponse::ColumnsLoaded { columns } => {
            state.set_columns(columns.iter().map(ColumnSpec::to_column).collect());
            (true, vec![])
        }
        WorkerResponse::PreferencesLoaded { preferences } => match preferences {
            Some(preferences) if !preferences.is_empty() => {
                state.apply_preferences(preferences);
                (true, vec![])
            }
            _ => (false, vec![]),
        },
        WorkerResponse::PreferencesSaved { key } => {
            tracing::debug!(key = %key, "preferences saved");
            (false, vec![])
        }
        WorkerResponse::ReportWritten { path } => {
            let shown = crate::infrastructure::strip_host_prefix(path);
            state.status = Some(format!("Report written to {shown}"));
            (true, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            state.loading = false;
            state.status = Some(format!("Error: {message}"));
            (true, vec![])
        }
    }
}

/// Logs an event without dumping row payloads.
struct EventKind<'a>(&'a Event);

impl std::fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::RowsChanged(rows) => write!(f, "RowsChanged({} rows)", rows.len()),
            Event::WorkerResponse(WorkerResponse::RowsLoaded { rows }) => {
                write!(f, "WorkerResponse(RowsLoaded({} rows))", rows.len())
            }
            Event::Char(_) => f.write_str("Char"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{TableProps, TableState};
    use crate::storage::models::ViewPreferences;
    use crate::table::column::ColumnDef;
    use crate::table::sort::SortSpec;
    use crate::ui::theme::Theme;

    fn state(count: usize) -> TableState {
        let rows = (1..=count)
            .map(|n| Record::new().with("n", n).with("name", format!("Patient {n}")))
            .collect();
        let columns = vec![ColumnDef::new("n", "#"), ColumnDef::new("name", "Name")];
        TableState::new(TableProps::new(rows, columns), Theme::default())
    }

    fn send(state: &mut TableState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    #[test]
    fn typing_filters_only_in_typing_focus() {
        let mut state = state(30);
        assert_eq!(send(&mut state, Event::Char('x')), (false, vec![]));
        assert!(state.search_query.is_empty());

        send(&mut state, Event::SearchMode);
        for c in "patient 2".chars() {
            send(&mut state, Event::Char(c));
        }
        assert_eq!(state.visible_len(), 11);

        send(&mut state, Event::FocusResults);
        assert_eq!(state.input_mode, InputMode::Search(SearchFocus::Navigating));
        send(&mut state, Event::Char('9'));
        assert_eq!(state.search_query, "patient 2");

        send(&mut state, Event::ExitSearch);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.visible_len(), 30);
    }

    #[test]
    fn focus_results_with_empty_query_leaves_search() {
        let mut state = state(3);
        send(&mut state, Event::SearchMode);
        send(&mut state, Event::FocusResults);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn backspace_on_empty_query_does_not_render() {
        let mut state = state(3);
        send(&mut state, Event::SearchMode);
        assert_eq!(send(&mut state, Event::Backspace), (false, vec![]));
    }

    #[test]
    fn sorting_persists_preferences() {
        let mut state = state(3);
        send(&mut state, Event::FocusNextColumn);
        let (render, actions) = send(&mut state, Event::SortFocusedColumn);
        assert!(render);
        assert_eq!(
            actions,
            vec![Action::PersistPreferences(ViewPreferences::new(
                Some(SortSpec::ascending("name")),
                Some(10)
            ))]
        );
    }

    #[test]
    fn sorting_unknown_column_is_ignored() {
        let mut state = state(3);
        assert_eq!(send(&mut state, Event::SortColumn(7)), (false, vec![]));
    }

    #[test]
    fn page_navigation_reports_changes() {
        let mut state = state(25);
        assert_eq!(send(&mut state, Event::PreviousPage), (false, vec![]));
        assert_eq!(send(&mut state, Event::LastPage), (true, vec![]));
        assert_eq!(state.pagination.page_index, 2);
        assert_eq!(send(&mut state, Event::NextPage), (false, vec![]));
        assert_eq!(send(&mut state, Event::FirstPage), (true, vec![]));
    }

    #[test]
    fn page_size_change_resets_index_and_persists() {
        let mut state = state(25);
        send(&mut state, Event::NextPage);
        let (render, actions) = send(&mut state, Event::SetPageSize(20));
        assert!(render);
        assert_eq!(state.pagination.page_index, 0);
        assert!(matches!(&actions[..], [Action::PersistPreferences(p)] if p.page_size == Some(20)));

        assert_eq!(send(&mut state, Event::SetPageSize(20)), (false, vec![]));
    }

    #[test]
    fn scrolling_reaches_every_row_of_tall_pages() {
        let mut state = state(60);
        send(&mut state, Event::SetPageSize(50));
        state.set_pane_rows(20);

        let mut seen = Vec::new();
        loop {
            let vm = state.compute_viewmodel(20, 80);
            seen.extend(vm.rows.iter().map(|row| row.row_number));
            if !send(&mut state, Event::ScrollDown).0 {
                break;
            }
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, (1..=60).collect::<Vec<usize>>());
        assert_eq!(state.pagination.page_index, 1);
    }

    #[test]
    fn scrolling_up_from_a_page_top_lands_on_the_previous_bottom() {
        let mut state = state(60);
        send(&mut state, Event::SetPageSize(50));
        state.set_pane_rows(20);
        send(&mut state, Event::NextPage);

        assert_eq!(send(&mut state, Event::ScrollUp), (true, vec![]));
        assert_eq!(state.pagination.page_index, 0);
        let vm = state.compute_viewmodel(20, 80);
        assert_eq!(vm.rows.last().map(|row| row.row_number), Some(50));

        send(&mut state, Event::FirstPage);
        assert_eq!(state.scroll_offset, 38);
        for _ in 0..38 {
            send(&mut state, Event::ScrollUp);
        }
        assert_eq!(send(&mut state, Event::ScrollUp), (false, vec![]));
    }

    #[test]
    fn refresh_and_print_need_opt_in() {
        let mut state = state(3);
        assert_eq!(send(&mut state, Event::Refresh), (false, vec![]));
        assert_eq!(send(&mut state, Event::Print), (false, vec![]));

        state.refreshable = true;
        state.printable = true;
        assert_eq!(send(&mut state, Event::Refresh), (false, vec![Action::Refresh]));
        let (_, actions) = send(&mut state, Event::Print);
        assert!(matches!(&actions[..], [Action::Print { report }] if report.contains("Patient 3")));
    }

    #[test]
    fn rows_loaded_clamps_page() {
        let mut state = state(30);
        send(&mut state, Event::LastPage);

        let rows = (1..=5).map(|n| Record::new().with("n", n)).collect();
        let (render, _) = send(&mut state, Event::WorkerResponse(WorkerResponse::RowsLoaded { rows }));
        assert!(render);
        assert_eq!(state.pagination.page_index, 0);
        assert_eq!(state.visible_len(), 5);
    }

    #[test]
    fn rows_changed_keeps_valid_page_and_clamps_invalid_one() {
        let mut state = state(25);
        send(&mut state, Event::LastPage);

        let rows: Vec<Record> = (1..=21).map(|n| Record::new().with("n", n)).collect();
        assert_eq!(send(&mut state, Event::RowsChanged(rows)), (true, vec![]));
        assert_eq!(state.pagination.page_index, 2);
        assert_eq!(state.page_records().len(), 1);

        let rows: Vec<Record> = (1..=8).map(|n| Record::new().with("n", n)).collect();
        assert_eq!(send(&mut state, Event::RowsChanged(rows)), (true, vec![]));
        assert_eq!(state.pagination.page_index, 0);
        assert_eq!(state.visible_len(), 8);
    }

    #[test]
    fn rows_changed_keeps_query_and_sort() {
        let mut state = state(30);
        send(&mut state, Event::SortColumn(0));
        send(&mut state, Event::SortColumn(0));
        state.set_query("patient 1");

        let rows = (1..=12)
            .map(|n| Record::new().with("n", n).with("name", format!("Patient {n}")))
            .collect();
        send(&mut state, Event::RowsChanged(rows));

        let order: Vec<u64> = state.visible_records().filter_map(|r| r.value("n").as_u64()).collect();
        assert_eq!(order, vec![12, 11, 10, 1]);
    }

    #[test]
    fn columns_changed_replace_definitions_and_refilter() {
        let mut state = state(12);
        state.set_query("patient 1");
        assert_eq!(state.visible_len(), 4);

        // Only the number column is searchable now: no row shows "patient"
        let specs = crate::table::column::parse_column_specs("[[columns]]\nkey = \"n\"\n").unwrap();
        assert_eq!(send(&mut state, Event::ColumnsChanged(specs)), (true, vec![]));
        assert_eq!(state.columns.len(), 1);
        assert_eq!(state.columns[0].accessor_key, "n");
        assert_eq!(state.visible_len(), 0);

        send(&mut state, Event::ColumnsChanged(Vec::new()));
        assert_eq!(state.columns.len(), 2);
        assert_eq!(state.visible_len(), 4);
    }

    #[test]
    fn columns_loaded_replace_definitions() {
        let mut state = state(3);
        let specs = crate::table::column::parse_column_specs("[[columns]]\nkey = \"name\"\n").unwrap();
        send(&mut state, Event::WorkerResponse(WorkerResponse::ColumnsLoaded { columns: specs }));
        assert_eq!(state.columns.len(), 1);
        assert_eq!(state.columns[0].accessor_key, "name");
    }

    #[test]
    fn preferences_loaded_apply_sort() {
        let mut state = state(3);
        let preferences = Some(ViewPreferences::new(Some(SortSpec::descending("n")), None));
        send(&mut state, Event::WorkerResponse(WorkerResponse::PreferencesLoaded { preferences }));
        assert_eq!(state.page_records()[0].value("n"), 3);

        let (render, _) = send(
            &mut state,
            Event::WorkerResponse(WorkerResponse::PreferencesLoaded { preferences: None }),
        );
        assert!(!render);
    }

    #[test]
    fn status_shows_once() {
        let mut state = state(3);
        send(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Error { message: "rows file missing".to_string() }),
        );
        assert_eq!(state.status.as_deref(), Some("Error: rows file missing"));

        let (render, _) = send(&mut state, Event::PreviousPage);
        assert!(render);
        assert!(state.status.is_none());
    }
}
