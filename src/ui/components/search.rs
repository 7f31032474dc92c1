//! Search box renderer.
//!
//! ```text
//! [margin] ┌──────────────────────┐ [margin]
//! [margin] │ Search: jo▏          │ [margin]
//! [margin] └──────────────────────┘ [margin]
//! ```

use crate::ui::helpers::{display_width, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

const CURSOR: char = '▏';

/// Renders the 3-line search box at `row`. Returns `row + 3`.
///
/// The cursor is drawn only while keystrokes go into the query.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let margin = if cols > SEARCH_BOX_MARGIN * 2 + 20 {
        SEARCH_BOX_MARGIN
    } else {
        0
    };
    let box_width = cols.saturating_sub(margin * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);

    position_cursor(row, 1);
    print!("{}", " ".repeat(margin));
    print!("{border}┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let mut search_text = format!(" Search: {}", search.query);
    if search.typing {
        search_text.push(CURSOR);
    }
    let search_text = truncate(&search_text, inner_width);
    let padding = inner_width.saturating_sub(display_width(&search_text));

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(margin));
    print!("{border}│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{search_text}");
    print!("{}", " ".repeat(padding));
    print!("{border}│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(margin));
    print!("{border}└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
