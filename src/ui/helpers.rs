//! Shared rendering utilities.
//!
//! Text measurement here is by `char`, which matches terminal cells for the
//! Latin, digit and punctuation content of clinic listings. Highlight ranges are
//! character indices for the same reason.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::Align;

const ELLIPSIS: char = '…';

/// Positions the cursor at a 1-indexed row and column.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Display width of `text` in terminal cells.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Shortens `text` to at most `width` cells, ending in `…` when cut.
///
/// # Example
///
/// ```rust
/// use clinic_table::ui::helpers::truncate;
///
/// assert_eq!(truncate("Jolene Smith", 8), "Jolene …");
/// assert_eq!(truncate("Jo", 8), "Jo");
/// assert_eq!(truncate("Jo", 0), "");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// Pads `text` with spaces to exactly `width` cells (truncating first if needed).
#[must_use]
pub fn pad(text: &str, width: usize, align: Align) -> String {
    let text = truncate(text, width);
    let gap = width.saturating_sub(display_width(&text));
    match align {
        Align::Left => format!("{text}{}", " ".repeat(gap)),
        Align::Right => format!("{}{text}", " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

/// Number of padding cells placed before `text` for the given alignment.
#[must_use]
pub fn leading_pad(text_width: usize, width: usize, align: Align) -> usize {
    let gap = width.saturating_sub(text_width);
    match align {
        Align::Left => 0,
        Align::Right => gap,
        Align::Center => gap / 2,
    }
}

/// Prints `text` with the given character ranges highlighted.
///
/// `restore` is the escape sequence of the surrounding style, re-applied after
/// each highlighted run so the rest of the cell keeps its colour.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, restore: &str) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }

        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{restore}");

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
