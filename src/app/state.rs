//! Table view state and view model computation.
//!
//! [`TableState`] is the single source of truth for one mounted table: the
//! caller's rows and columns, the view state (query, sort, pagination), and the
//! derived list of visible rows. Every mutation that can change the visible set
//! ends in [`TableState::recompute`], which re-runs filter → sort and then clamps
//! the page index. That call is the explicit form of "re-validate the page
//! whenever the row count changes".
//!
//! # Example
//!
//! ```rust
//! use clinic_table::app::{TableProps, TableState};
//! use clinic_table::{ColumnDef, Record, Theme};
//!
//! let rows: Vec<Record> = (1..=25).map(|n| Record::new().with("n", n)).collect();
//! let props = TableProps::new(rows, vec![ColumnDef::new("n", "#")]);
//! let mut state = TableState::new(props, Theme::default());
//!
//! state.next_page();
//! state.next_page();
//! assert_eq!(state.current_page().rows.len(), 5);
//! assert!(!state.next_page());
//! ```

use super::modes::InputMode;
use crate::domain::record::Record;
use crate::storage::models::ViewPreferences;
use crate::table::column::{infer_columns, Cell, ColumnDef};
use crate::table::filter::{fuzzy_match_ranges, match_ranges, MatchMode};
use crate::table::paginate::{paginate, ClampPolicy, Page, Pagination, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS};
use crate::table::process_indices;
use crate::table::sort::{SortDirection, SortSpec};
use crate::ui::helpers::{display_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    Align, CellKind, ColumnHeader, DisplayCell, DisplayRow, EmptyState, FooterInfo, HeaderInfo,
    PaginationInfo, SearchBarInfo, UIViewModel,
};

/// Lines used by the title, borders, column header, pagination bar and footer.
const CHROME_ROWS: usize = 8;
/// Extra lines used by the search box.
const SEARCH_BAR_ROWS: usize = 3;
const BODY_MARGIN: usize = 1;
const COLUMN_GAP: usize = 2;
const MIN_COLUMN_WIDTH: usize = 4;
const MAX_COLUMN_WIDTH: usize = 40;
/// Cells taken by the sort indicator and the space before it.
const INDICATOR_WIDTH: usize = 2;

/// Construction contract of a table.
///
/// `refreshable` and `printable` stand in for refresh and print callbacks: when
/// set, the corresponding events produce [`Action::Refresh`] and
/// [`Action::Print`]; otherwise those events are ignored.
///
/// [`Action::Refresh`]: crate::app::Action::Refresh
/// [`Action::Print`]: crate::app::Action::Print
#[derive(Debug, Clone)]
pub struct TableProps {
    pub rows: Vec<Record>,

    /// Column definitions. When empty, columns are inferred from the keys of
    /// the first row, and re-inferred whenever rows change.
    pub columns: Vec<ColumnDef>,

    pub title: String,
    pub empty_message: String,
    pub initial_sort: Option<SortSpec>,

    /// Page size imposed by the caller. Takes precedence over remembered
    /// preferences and the first page-size option.
    pub forced_page_size: Option<usize>,

    pub page_size_options: Vec<usize>,
    pub refreshable: bool,
    pub printable: bool,
    pub match_mode: MatchMode,
    pub clamp_policy: ClampPolicy,

    /// Rows are still being fetched; the empty state says so.
    pub loading: bool,
}

impl Default for TableProps {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            columns: Vec::new(),
            title: "Records".to_string(),
            empty_message: "No records found.".to_string(),
            initial_sort: None,
            forced_page_size: None,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            refreshable: false,
            printable: false,
            match_mode: MatchMode::default(),
            clamp_policy: ClampPolicy::default(),
            loading: false,
        }
    }
}

impl TableProps {
    #[must_use]
    pub fn new(rows: Vec<Record>, columns: Vec<ColumnDef>) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }
}

/// State of one mounted table.
#[derive(Debug, Clone)]
pub struct TableState {
    /// Caller-supplied rows, never mutated.
    pub rows: Vec<Record>,
    pub columns: Vec<ColumnDef>,

    /// Indices into `rows` after filtering and sorting, in display order.
    visible: Vec<usize>,

    pub search_query: String,
    pub sort: Option<SortSpec>,
    pub pagination: Pagination,
    pub input_mode: InputMode,

    /// First row of the current page drawn in the body, for pages taller
    /// than the pane.
    pub scroll_offset: usize,
    /// Height of the pane last rendered into.
    pane_rows: Option<usize>,

    /// Column targeted by keyboard sorting.
    pub focused_column: usize,

    pub title: String,
    pub empty_message: String,
    pub page_size_options: Vec<usize>,
    pub forced_page_size: Option<usize>,
    pub refreshable: bool,
    pub printable: bool,
    pub match_mode: MatchMode,
    pub clamp_policy: ClampPolicy,
    pub loading: bool,
    pub theme: Theme,

    /// One-shot message shown in the footer (report written, load failure).
    pub status: Option<String>,

    columns_inferred: bool,
}

impl TableState {
    /// Creates a table from its props and runs the pipeline once.
    #[must_use]
    pub fn new(props: TableProps, theme: Theme) -> Self {
        let columns_inferred = props.columns.is_empty();
        let columns = if columns_inferred {
            infer_columns(&props.rows)
        } else {
            props.columns
        };

        let mut page_size_options: Vec<usize> = props
            .page_size_options
            .into_iter()
            .filter(|&size| size > 0)
            .collect();
        page_size_options.sort_unstable();
        page_size_options.dedup();

        let page_size = props
            .forced_page_size
            .or_else(|| page_size_options.first().copied())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let mut state = Self {
            rows: props.rows,
            columns,
            visible: Vec::new(),
            search_query: String::new(),
            sort: props
                .initial_sort
                .filter(|spec| spec.direction != SortDirection::None),
            pagination: Pagination::with_page_size(page_size),
            input_mode: InputMode::Normal,
            scroll_offset: 0,
            pane_rows: None,
            focused_column: 0,
            title: props.title,
            empty_message: props.empty_message,
            page_size_options,
            forced_page_size: props.forced_page_size,
            refreshable: props.refreshable,
            printable: props.printable,
            match_mode: props.match_mode,
            clamp_policy: props.clamp_policy,
            loading: props.loading,
            theme,
            status: None,
            columns_inferred,
        };
        state.recompute();
        state
    }

    /// Re-runs filter → sort over the rows, clamps the page index and scrolls
    /// back to the top of the page.
    pub fn recompute(&mut self) {
        let _span = tracing::debug_span!("recompute",
            rows = self.rows.len(),
            query_len = self.search_query.len(),
            sort = ?self.sort
        )
        .entered();

        self.visible = process_indices(
            &self.rows,
            &self.columns,
            &self.search_query,
            self.match_mode,
            self.sort.as_ref(),
            &mut self.pagination,
            self.clamp_policy,
        );
        self.scroll_offset = 0;

        tracing::debug!(
            visible = self.visible.len(),
            page_index = self.pagination.page_index,
            "view recomputed"
        );
    }

    /// Replaces the rows, for example after a reload or a deletion.
    pub fn set_rows(&mut self, rows: Vec<Record>) {
        tracing::debug!(old = self.rows.len(), new = rows.len(), "rows replaced");
        self.rows = rows;
        self.loading = false;
        if self.columns_inferred {
            self.columns = infer_columns(&self.rows);
            self.clamp_focus();
        }
        self.recompute();
    }

    /// Replaces the column definitions. An empty list switches back to
    /// inferring columns from the rows.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.columns_inferred = columns.is_empty();
        self.columns = if self.columns_inferred {
            infer_columns(&self.rows)
        } else {
            columns
        };
        self.clamp_focus();
        self.recompute();
    }

    fn clamp_focus(&mut self) {
        self.focused_column = self
            .focused_column
            .min(self.columns.len().saturating_sub(1));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.recompute();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.search_query.push(c);
        tracing::trace!(query = %self.search_query, "search query updated");
        self.recompute();
    }

    /// Removes the last query character. Returns `false` if the query was empty.
    pub fn pop_query_char(&mut self) -> bool {
        if self.search_query.pop().is_none() {
            return false;
        }
        self.recompute();
        true
    }

    pub fn clear_query(&mut self) -> bool {
        if self.search_query.is_empty() {
            return false;
        }
        self.search_query.clear();
        self.recompute();
        true
    }

    /// Header click on column `column_index`: none → ascending → descending →
    /// none, or ascending when switching columns.
    ///
    /// Returns `false` for unknown or non-sortable columns.
    pub fn cycle_sort(&mut self, column_index: usize) -> bool {
        let Some(column) = self.columns.get(column_index) else {
            return false;
        };
        if !column.is_sortable() {
            tracing::debug!(column = %column.accessor_key, "column is not sortable");
            return false;
        }

        let key = column.accessor_key.clone();
        self.sort = SortSpec::cycle(self.sort.as_ref(), &key);
        self.focused_column = column_index;
        tracing::debug!(sort = ?self.sort, "sort cycled");
        self.recompute();
        true
    }

    /// Current direction of column `column_index`.
    #[must_use]
    pub fn sort_direction(&self, column_index: usize) -> SortDirection {
        self.columns
            .get(column_index)
            .map_or(SortDirection::None, |c| {
                SortSpec::direction_for(self.sort.as_ref(), &c.accessor_key)
            })
    }

    pub fn focus_next_column(&mut self) -> bool {
        if self.columns.is_empty() {
            return false;
        }
        self.focused_column = (self.focused_column + 1) % self.columns.len();
        true
    }

    pub fn focus_previous_column(&mut self) -> bool {
        if self.columns.is_empty() {
            return false;
        }
        self.focused_column = if self.focused_column == 0 {
            self.columns.len() - 1
        } else {
            self.focused_column - 1
        };
        true
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.pagination.next_page(self.visible.len());
        self.page_moved(moved)
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.pagination.previous_page();
        self.page_moved(moved)
    }

    pub fn first_page(&mut self) -> bool {
        let moved = self.pagination.first_page();
        self.page_moved(moved)
    }

    pub fn last_page(&mut self) -> bool {
        let moved = self.pagination.last_page(self.visible.len());
        self.page_moved(moved)
    }

    fn page_moved(&mut self, moved: bool) -> bool {
        if moved {
            self.scroll_offset = 0;
        }
        moved
    }

    /// Changes the page size from the selector. Resets to the first page when
    /// the size changes.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let changed = self.pagination.set_page_size(page_size);
        self.pagination.clamp(self.visible.len(), self.clamp_policy);
        self.page_moved(changed)
    }

    /// Page rows that fit in the body of a pane `rows` lines high.
    #[must_use]
    pub fn body_capacity(&self, rows: usize) -> usize {
        let chrome = CHROME_ROWS + if self.input_mode.is_search() { SEARCH_BAR_ROWS } else { 0 };
        rows.saturating_sub(chrome).max(1)
    }

    /// Remembers the pane height so scrolling stops once the last page row is
    /// on screen.
    pub fn set_pane_rows(&mut self, rows: usize) {
        self.pane_rows = Some(rows);
    }

    fn max_scroll_offset(&self) -> usize {
        let capacity = self.pane_rows.map_or(1, |rows| self.body_capacity(rows));
        self.current_page().rows.len().saturating_sub(capacity)
    }

    /// Scrolls the body one row down within the current page. Returns `false`
    /// when the last page row is already on screen.
    pub fn scroll_down(&mut self) -> bool {
        if self.scroll_offset >= self.max_scroll_offset() {
            return false;
        }
        self.scroll_offset += 1;
        true
    }

    /// Scrolls the body one row up. Returns `false` at the top of the page.
    pub fn scroll_up(&mut self) -> bool {
        let offset = self.scroll_offset.min(self.max_scroll_offset());
        self.scroll_offset = offset.saturating_sub(1);
        offset > 0
    }

    /// Scrolls so the last rows of the page are on screen.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll_offset();
    }

    /// Moves the page-size selector to the next larger (or smaller) option.
    pub fn cycle_page_size(&mut self, forward: bool) -> bool {
        let current = self.pagination.page_size;
        let next = if forward {
            self.page_size_options.iter().copied().find(|&size| size > current)
        } else {
            self.page_size_options.iter().rev().copied().find(|&size| size < current)
        };
        next.is_some_and(|size| self.set_page_size(size))
    }

    /// The caller changed its forced page size.
    pub fn set_forced_page_size(&mut self, page_size: Option<usize>) -> bool {
        self.forced_page_size = page_size;
        page_size.is_some_and(|size| self.set_page_size(size))
    }

    /// Number of rows after filtering.
    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Filtered and sorted rows, in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    /// The current page, as indices into `rows`.
    #[must_use]
    pub fn current_page(&self) -> Page<'_, usize> {
        paginate(&self.visible, self.pagination.page_index, self.pagination.page_size)
    }

    /// Records on the current page.
    #[must_use]
    pub fn page_records(&self) -> Vec<&Record> {
        self.current_page()
            .rows
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    #[must_use]
    pub fn preferences(&self) -> ViewPreferences {
        ViewPreferences::new(self.sort.clone(), Some(self.pagination.page_size))
    }

    /// Restores remembered sort and page size. A forced page size wins over a
    /// remembered one.
    pub fn apply_preferences(&mut self, preferences: &ViewPreferences) {
        if let Some(sort) = preferences
            .sort
            .as_ref()
            .filter(|spec| spec.direction != SortDirection::None)
        {
            self.sort = Some(sort.clone());
        }
        if self.forced_page_size.is_none() {
            if let Some(size) = preferences.page_size {
                self.pagination.set_page_size(size);
            }
        }
        tracing::debug!(preferences = ?preferences, "preferences applied");
        self.recompute();
    }

    /// Plain-text rendering of every visible row for printing.
    #[must_use]
    pub fn report(&self) -> String {
        let records: Vec<&Record> = self.visible_records().collect();
        crate::ui::report::render_report(&self.title, &self.columns, &records)
    }

    /// Computes a renderable view model for a pane of `rows` × `cols` cells.
    ///
    /// Column widths fit the current page's content, capped and shrunk widest
    /// first until the row fits the pane. When the page is taller than the
    /// pane, the body shows the rows from [`TableState::scroll_offset`] on and
    /// the rows outside that window are counted in
    /// [`PaginationInfo::rows_above`] and [`PaginationInfo::rows_below`].
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let search_bar = self.compute_search_bar();
        let body_capacity = self.body_capacity(rows);

        let page = self.current_page();
        let offset = self.scroll_offset.min(page.rows.len().saturating_sub(body_capacity));
        let end = (offset + body_capacity).min(page.rows.len());

        let cells: Vec<Vec<Cell>> = page.rows[offset..end]
            .iter()
            .map(|&i| self.columns.iter().map(|c| c.render(&self.rows[i])).collect())
            .collect();

        let labels: Vec<String> = (0..self.columns.len())
            .map(|index| self.columns[index].header_label(self.sort_direction(index)))
            .collect();

        let widths = self.column_widths(&labels, &cells, cols);
        let columns = self.compute_column_headers(&labels, &widths);

        let display_rows = cells
            .iter()
            .enumerate()
            .map(|(position, row_cells)| DisplayRow {
                row_number: page.start_row_number + offset + position,
                cells: row_cells
                    .iter()
                    .zip(&columns)
                    .zip(&self.columns)
                    .map(|((cell, header), column)| self.compute_display_cell(cell, header, column))
                    .collect(),
            })
            .collect();

        let empty_state = page.is_empty().then(|| self.compute_empty_state());

        let header_row = 4 + if search_bar.is_some() { SEARCH_BAR_ROWS } else { 0 };

        UIViewModel {
            header: self.compute_header(),
            search_bar,
            columns,
            header_row,
            rows: display_rows,
            empty_state,
            pagination: PaginationInfo {
                page_number: page.page_index + 1,
                page_count: page.page_count,
                start_row_number: page.start_row_number,
                end_row_number: page.end_row_number,
                total_rows: page.total_rows,
                page_size: self.pagination.page_size,
                page_size_options: self.page_size_options.clone(),
                has_previous: page.has_previous(),
                has_next: page.has_next(),
                rows_above: offset,
                rows_below: page.rows.len() - end,
            },
            footer: self.compute_footer(),
        }
    }

    fn column_widths(&self, labels: &[String], cells: &[Vec<Cell>], cols: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let indicator = if column.is_sortable() { INDICATOR_WIDTH } else { 0 };
                let content = cells
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| display_width(cell.text()))
                    .max()
                    .unwrap_or(0);
                (display_width(&labels[index]) + indicator)
                    .max(content)
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect();

        let available = cols.saturating_sub(BODY_MARGIN * 2);
        let gaps = COLUMN_GAP * widths.len().saturating_sub(1);

        while widths.iter().sum::<usize>() + gaps > available {
            let Some(widest) = widths
                .iter_mut()
                .filter(|w| **w > MIN_COLUMN_WIDTH)
                .max_by_key(|w| **w)
            else {
                break;
            };
            *widest -= 1;
        }

        widths
    }

    fn compute_column_headers(&self, labels: &[String], widths: &[usize]) -> Vec<ColumnHeader> {
        let mut start_col = 1 + BODY_MARGIN;

        self.columns
            .iter()
            .zip(labels.iter().zip(widths))
            .enumerate()
            .map(|(index, (column, (label, &width)))| {
                let direction = self.sort_direction(index);
                let sortable = column.is_sortable();
                let indicator = if sortable {
                    match direction {
                        SortDirection::None => "↕",
                        SortDirection::Ascending => "▲",
                        SortDirection::Descending => "▼",
                    }
                } else {
                    ""
                };
                let label_width = if sortable {
                    width.saturating_sub(INDICATOR_WIDTH)
                } else {
                    width
                };

                let header = ColumnHeader {
                    label: truncate(label, label_width),
                    indicator: indicator.to_string(),
                    width,
                    start_col,
                    focused: index == self.focused_column,
                    sortable,
                    direction,
                    align: align_for(column),
                };
                start_col += width + COLUMN_GAP;
                header
            })
            .collect()
    }

    fn compute_display_cell(&self, cell: &Cell, header: &ColumnHeader, column: &ColumnDef) -> DisplayCell {
        let text = truncate(cell.text(), header.width);
        let highlight_ranges = self.compute_highlight_ranges(&text);
        let kind = match cell {
            Cell::Text(_) => CellKind::Text,
            Cell::Badge(_) => CellKind::Badge,
            Cell::Link { .. } => CellKind::Link,
        };

        DisplayCell {
            text,
            kind,
            highlight_ranges,
            width: header.width,
            align: header.align,
            dim: column.display_class.as_deref().is_some_and(|class| has_class(class, "dim")),
        }
    }

    fn compute_highlight_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        if self.search_query.is_empty() {
            return Vec::new();
        }
        match self.match_mode {
            MatchMode::Substring => match_ranges(text, &self.search_query),
            MatchMode::Fuzzy => fuzzy_match_ranges(text, &self.search_query),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let total = self.rows.len();
        let visible = self.visible.len();
        let title = if self.search_query.is_empty() {
            format!(" {} ({total}) ", self.title)
        } else {
            format!(" {} ({visible} of {total}) ", self.title)
        };
        HeaderInfo { title }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let subtitle = if self.loading {
            "Loading rows…".to_string()
        } else if !self.search_query.is_empty() {
            format!("No rows match \"{}\"", self.search_query)
        } else {
            String::new()
        };

        EmptyState {
            message: self.empty_message.clone(),
            subtitle,
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        use super::modes::SearchFocus;

        let keybindings = match self.input_mode {
            InputMode::Search(SearchFocus::Typing) => {
                "Esc: clear search  Enter: keep query  ←/→: page  Type to filter".to_string()
            }
            InputMode::Search(SearchFocus::Navigating) => {
                "Esc: clear search  /: edit query  j/k: scroll  h/l: column  s: sort  n/p: page  +/-: page size  q: quit"
                    .to_string()
            }
            InputMode::Normal => {
                let mut hints = vec![
                    "/: search",
                    "j/k: scroll",
                    "h/l: column",
                    "s or 1-9: sort",
                    "n/p: page",
                    "g/G: first/last",
                    "+/-: page size",
                ];
                if self.refreshable {
                    hints.push("r: refresh");
                }
                if self.printable {
                    hints.push("P: print");
                }
                hints.push("q: quit");
                hints.join("  ")
            }
        };

        FooterInfo {
            keybindings,
            status: self.status.clone(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        self.input_mode.is_search().then(|| SearchBarInfo {
            query: self.search_query.clone(),
            typing: self.input_mode.is_typing(),
        })
    }
}

fn has_class(classes: &str, wanted: &str) -> bool {
    classes.split_whitespace().any(|class| class == wanted)
}

fn align_for(column: &ColumnDef) -> Align {
    match column.display_class.as_deref() {
        Some(classes) if has_class(classes, "align-right") => Align::Right,
        Some(classes) if has_class(classes, "align-center") => Align::Center,
        _ => Align::Left,
    }
}
