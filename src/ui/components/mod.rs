//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: title bar with row counts
//! - [`search`]: search input box
//! - [`table`]: column headers and body rows
//! - [`empty`]: empty-state row
//! - [`pagination`]: previous/next controls, counters and page-size selector
//! - [`footer`]: key hints or status message
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Column Headers]
//! [Border]
//! [Body Rows | Empty State]
//! [Border]                      rows - 2
//! [Pagination]                  rows - 1
//! [Footer]                      rows
//! ```

mod empty;
mod footer;
mod header;
pub mod pagination;
mod search;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use pagination::render_pagination;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal border line at `row`. Returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders a full frame.
pub fn render_table_view(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    current_row = render_table_headers(current_row, &vm.columns, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    let _body_end = match &vm.empty_state {
        Some(empty) => render_empty_state(current_row, empty, theme, cols),
        None => render_table_rows(current_row, &vm.rows, theme, cols),
    };

    let footer_row = rows;
    let pagination_row = footer_row.saturating_sub(1);
    let border_row = pagination_row.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_pagination(pagination_row, &vm.pagination, theme, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
