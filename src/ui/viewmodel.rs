//! View model types representing renderable table state.
//!
//! View models are computed by [`TableState::compute_viewmodel`] and consumed by
//! the renderer. They carry no business logic: column widths, truncated cell
//! text, highlight ranges and pagination labels are all resolved up front so the
//! components only print.
//!
//! [`TableState::compute_viewmodel`]: crate::app::TableState::compute_viewmodel

use crate::table::sort::SortDirection;

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Present while the search bar is shown.
    pub search_bar: Option<SearchBarInfo>,

    pub columns: Vec<ColumnHeader>,

    /// 1-based terminal line of the column header row, used for click hit-testing.
    pub header_row: usize,

    /// Body rows of the current page that fit on screen.
    pub rows: Vec<DisplayRow>,

    /// Shown as a single body row when the current page has no rows.
    pub empty_state: Option<EmptyState>,

    pub pagination: PaginationInfo,

    pub footer: FooterInfo,
}

impl UIViewModel {
    /// Index of the column whose header occupies the given 1-based terminal
    /// position, if any.
    #[must_use]
    pub fn column_at(&self, line: usize, col: usize) -> Option<usize> {
        if line != self.header_row {
            return None;
        }
        self.columns
            .iter()
            .position(|c| col >= c.start_col && col < c.start_col + c.width)
    }
}

/// Title bar contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderInfo {
    pub title: String,
}

/// Search input contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,

    /// Whether keystrokes currently go into the query (draws the cursor).
    pub typing: bool,
}

/// Horizontal alignment of a column, from its display class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// One column header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Header text, already truncated to fit `width` together with the indicator.
    pub label: String,

    /// Sort affordance: `↕` neutral, `▲` ascending, `▼` descending, empty when
    /// the column is not sortable.
    pub indicator: String,

    /// Display width in terminal cells.
    pub width: usize,

    /// 1-based terminal column where this header starts.
    pub start_col: usize,

    /// Whether keyboard focus is on this column (`s` sorts it).
    pub focused: bool,

    pub sortable: bool,

    pub direction: SortDirection,

    pub align: Align,
}

/// What kind of cell a [`DisplayCell`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    #[default]
    Text,
    Badge,
    Link,
}

/// One body cell, truncated to its column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
    pub text: String,
    pub kind: CellKind,

    /// Character ranges of `text` matching the search query.
    pub highlight_ranges: Vec<(usize, usize)>,

    pub width: usize,
    pub align: Align,
    pub dim: bool,
}

/// One body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 1-based position of the row in the filtered, sorted set.
    pub row_number: usize,
    pub cells: Vec<DisplayCell>,
}

/// Empty-state message shown in place of body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Pagination controls and counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationInfo {
    /// 1-based.
    pub page_number: usize,
    pub page_count: usize,
    pub start_row_number: usize,
    pub end_row_number: usize,
    pub total_rows: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,

    /// Rows of the current page scrolled off above the body.
    pub rows_above: usize,
    /// Rows of the current page that did not fit below the body.
    pub rows_below: usize,
}

/// Footer contents: key hints, or a status message when one is pending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FooterInfo {
    pub keybindings: String,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(start_col: usize, width: usize) -> ColumnHeader {
        ColumnHeader {
            label: String::new(),
            indicator: String::new(),
            width,
            start_col,
            focused: false,
            sortable: true,
            direction: SortDirection::None,
            align: Align::Left,
        }
    }

    #[test]
    fn column_at_hits_header_cells_only() {
        let vm = UIViewModel {
            header: HeaderInfo::default(),
            search_bar: None,
            columns: vec![header(2, 10), header(14, 6)],
            header_row: 4,
            rows: vec![],
            empty_state: None,
            pagination: PaginationInfo::default(),
            footer: FooterInfo::default(),
        };

        assert_eq!(vm.column_at(4, 2), Some(0));
        assert_eq!(vm.column_at(4, 11), Some(0));
        assert_eq!(vm.column_at(4, 12), None);
        assert_eq!(vm.column_at(4, 19), Some(1));
        assert_eq!(vm.column_at(4, 20), None);
        assert_eq!(vm.column_at(5, 3), None);
    }
}
