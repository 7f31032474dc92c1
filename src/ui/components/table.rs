//! Table renderer: column headers with sort indicators, and body rows.
//!
//! Every column occupies its view-model width followed by a two-cell gap.
//! Header cells reserve their last two cells for the sort indicator when the
//! column is sortable.

use crate::ui::helpers::{self, display_width, leading_pad, pad, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CellKind, ColumnHeader, DisplayCell, DisplayRow};

const LEFT_MARGIN: usize = 1;
const COLUMN_GAP: usize = 2;

/// Renders the column header line at `row`. Returns the next row.
///
/// The focused column is drawn in the selection colors so `s` has a visible
/// target.
pub fn render_table_headers(row: usize, columns: &[ColumnHeader], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", " ".repeat(LEFT_MARGIN));
    let mut used = LEFT_MARGIN;

    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            print!("{}", " ".repeat(COLUMN_GAP));
            used += COLUMN_GAP;
        }

        let label_width = if column.sortable {
            column.width.saturating_sub(2)
        } else {
            column.width
        };

        print!("{}", Theme::bold());
        if column.focused {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.header_fg));
        }
        print!("{}", pad(&column.label, label_width, column.align));

        if column.sortable {
            print!(" {}", Theme::fg(&theme.colors.sort_indicator_fg));
            print!("{}", column.indicator);
        }
        print!("{}", Theme::reset());
        used += column.width;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    row + 1
}

/// Renders body rows starting at `row`. Returns the next free row.
pub fn render_table_rows(row: usize, rows: &[DisplayRow], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for display_row in rows {
        current_row = render_table_row(current_row, display_row, theme, cols);
    }
    current_row
}

fn render_table_row(row: usize, display_row: &DisplayRow, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", " ".repeat(LEFT_MARGIN));
    let mut used = LEFT_MARGIN;

    for (index, cell) in display_row.cells.iter().enumerate() {
        if index > 0 {
            print!("{}", " ".repeat(COLUMN_GAP));
            used += COLUMN_GAP;
        }
        render_cell(cell, theme);
        used += cell.width;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    row + 1
}

/// Prints one cell padded to its width.
fn render_cell(cell: &DisplayCell, theme: &Theme) {
    let text_width = display_width(&cell.text);
    let leading = leading_pad(text_width, cell.width, cell.align);
    let trailing = cell.width.saturating_sub(leading + text_width);

    print!("{}", " ".repeat(leading));

    let style = cell_style(cell, theme);
    print!("{style}");
    helpers::render_highlighted_text(&cell.text, &cell.highlight_ranges, theme, &style);
    print!("{}", Theme::reset());

    print!("{}", " ".repeat(trailing));
}

fn cell_style(cell: &DisplayCell, theme: &Theme) -> String {
    match cell.kind {
        CellKind::Badge => format!(
            "{}{}",
            Theme::fg(&theme.colors.badge_fg),
            Theme::bg(&theme.colors.badge_bg)
        ),
        CellKind::Link => format!("{}{}", Theme::underline(), Theme::fg(&theme.colors.link_fg)),
        CellKind::Text if cell.dim => Theme::fg(&theme.colors.text_dim),
        CellKind::Text => Theme::fg(&theme.colors.text_normal),
    }
}
