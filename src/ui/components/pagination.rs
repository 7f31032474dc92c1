//! Pagination bar renderer.
//!
//! ```text
//!  ‹ Prev  Page 2 of 3  Next ›   Showing 11–20 of 25        Rows: 10 [20] 30 40 50
//! ```
//!
//! Disabled previous/next controls are dimmed. Page rows that did not fit the
//! pane are reported after the counters.

use crate::ui::helpers::{display_width, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PaginationInfo;

/// Renders the pagination bar at `row`. Returns the next row.
pub fn render_pagination(row: usize, info: &PaginationInfo, theme: &Theme, cols: usize) -> usize {
    let normal = Theme::fg(&theme.colors.text_normal);
    let dimmed = format!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    let control = |enabled: bool| if enabled { normal.clone() } else { dimmed.clone() };

    let summary = summary_text(info);
    let selector = selector_text(info);

    let prev = "‹ Prev";
    let next = "Next ›";
    let left_width = 1 + display_width(prev) + 2 + display_width(&summary) + 2 + display_width(next);
    let selector_width = display_width(&selector);

    position_cursor(row, 1);
    if left_width + selector_width + 2 > cols {
        let compact = truncate(&format!(" {summary}"), cols);
        print!("{normal}{compact}{}", Theme::reset());
        print!("{}", " ".repeat(cols.saturating_sub(display_width(&compact))));
        return row + 1;
    }

    print!(" {}{prev}{}", control(info.has_previous), Theme::reset());
    print!("  {normal}{summary}{}", Theme::reset());
    print!("  {}{next}{}", control(info.has_next), Theme::reset());

    let gap = cols.saturating_sub(left_width + selector_width + 1);
    print!("{}", " ".repeat(gap));
    print!("{}{selector}{} ", Theme::fg(&theme.colors.text_dim), Theme::reset());

    row + 1
}

/// "Page X of Y   Showing a–b of n", plus notes for page rows scrolled out of
/// the body.
#[must_use]
pub fn summary_text(info: &PaginationInfo) -> String {
    let mut text = format!(
        "Page {} of {}   Showing {}–{} of {}",
        info.page_number, info.page_count, info.start_row_number, info.end_row_number, info.total_rows
    );
    if info.rows_above > 0 {
        text.push_str(&format!(" (+{} above)", info.rows_above));
    }
    if info.rows_below > 0 {
        text.push_str(&format!(" (+{} below)", info.rows_below));
    }
    text
}

/// "Rows: 10 [20] 30", the selected size in brackets. A size outside the
/// options (forced by the caller) is shown on its own.
#[must_use]
pub fn selector_text(info: &PaginationInfo) -> String {
    if !info.page_size_options.contains(&info.page_size) {
        return format!("Rows: [{}]", info.page_size);
    }

    let options: Vec<String> = info
        .page_size_options
        .iter()
        .map(|&size| {
            if size == info.page_size {
                format!("[{size}]")
            } else {
                size.to_string()
            }
        })
        .collect();
    format!("Rows: {}", options.join(" "))
}
