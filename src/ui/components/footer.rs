//! Footer renderer: key hints, or the pending status message.

use crate::ui::helpers::{display_width, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer centered at `row`. Returns the next row.
///
/// A status message replaces the key hints until the next event clears it.
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let (text, color) = match &footer.status {
        Some(status) => (status.as_str(), &theme.colors.status_fg),
        None => (footer.keybindings.as_str(), &theme.colors.text_dim),
    };

    let text = truncate(text, cols);
    let text_len = display_width(&text);
    let padding = cols.saturating_sub(text_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", " ".repeat(padding));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + text_len)));
    print!("{}", Theme::reset());
    row + 1
}
