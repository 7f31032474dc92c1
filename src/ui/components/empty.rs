//! Empty-state renderer.
//!
//! Takes the place of the body when the current page has no rows: the message
//! centered on the first body line, the subtitle (no match, still loading) dimmed
//! on the next one.

use crate::ui::helpers::{display_width, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the empty state starting at `row`. Returns the next row.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    let message = truncate(&empty.message, cols);
    let msg_len = display_width(&message);
    let msg_padding = cols.saturating_sub(msg_len) / 2;

    position_cursor(current_row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", " ".repeat(msg_padding));
    print!("{message}");
    print!("{}", " ".repeat(cols.saturating_sub(msg_padding + msg_len)));
    print!("{}", Theme::reset());
    current_row += 1;

    if !empty.subtitle.is_empty() {
        let subtitle = truncate(&empty.subtitle, cols);
        let sub_len = display_width(&subtitle);
        let sub_padding = cols.saturating_sub(sub_len) / 2;

        position_cursor(current_row, 1);
        print!("{}", Theme::dim());
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", " ".repeat(sub_padding));
        print!("{subtitle}");
        print!("{}", " ".repeat(cols.saturating_sub(sub_padding + sub_len)));
        print!("{}", Theme::reset());
        current_row += 1;
    }

    current_row
}
