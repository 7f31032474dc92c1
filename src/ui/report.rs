//! Plain-text report of a table, for printing.
//!
//! Covers every filtered and sorted row, not just the current page. Contains no
//! escape sequences, so the output can go straight to a file or a printer.

use crate::domain::record::Record;
use crate::table::column::ColumnDef;
use crate::table::sort::SortDirection;
use crate::ui::helpers::{display_width, pad, truncate};
use crate::ui::viewmodel::Align;

/// Cells wider than this are cut with `…`.
const MAX_REPORT_COLUMN_WIDTH: usize = 60;

/// Renders `records` as an aligned text table.
///
/// # Example
///
/// ```rust
/// use clinic_table::ui::report::render_report;
/// use clinic_table::{ColumnDef, Record};
///
/// let columns = vec![ColumnDef::new("name", "Name"), ColumnDef::new("age", "Age")];
/// let rows = vec![Record::new().with("name", "John Doe").with("age", 42)];
/// let refs: Vec<&Record> = rows.iter().collect();
///
/// let report = render_report("Patients", &columns, &refs);
/// assert_eq!(
///     report,
///     "Patients\n\nName      Age\n--------  ---\nJohn Doe  42\n\n1 row\n"
/// );
/// ```
#[must_use]
pub fn render_report(title: &str, columns: &[ColumnDef], records: &[&Record]) -> String {
    let headers: Vec<String> = columns
        .iter()
        .map(|c| c.header_label(SortDirection::None))
        .collect();

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| truncate(c.render(record).text(), MAX_REPORT_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            cells
                .iter()
                .map(|row| display_width(&row[index]))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_REPORT_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    out.push_str(title);
    out.push_str("\n\n");

    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }

    let count = records.len();
    out.push('\n');
    out.push_str(&format!("{count} {}\n", if count == 1 { "row" } else { "rows" }));
    out
}

fn push_line(out: &mut String, values: &[String], widths: &[usize]) {
    let line: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, &width)| pad(value, width, Align::Left))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_still_has_header() {
        let columns = vec![ColumnDef::new("name", "Name")];
        let report = render_report("Invoices", &columns, &[]);
        assert_eq!(report, "Invoices\n\nName\n----\n\n0 rows\n");
    }

    #[test]
    fn long_values_are_cut() {
        let columns = vec![ColumnDef::new("notes", "Notes")];
        let record = Record::new().with("notes", "x".repeat(80));
        let report = render_report("Visits", &columns, &[&record]);
        let line = report.lines().nth(4).unwrap();
        assert_eq!(display_width(line), MAX_REPORT_COLUMN_WIDTH);
        assert!(line.ends_with('…'));
    }
}
