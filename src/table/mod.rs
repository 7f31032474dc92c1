//! The table engine: column definitions and the pure filter, sort and paginate
//! stages.
//!
//! Data flows one way, `rows → filter → sort → paginate`. Each stage is a pure
//! function over borrowed rows. [`process_indices`] runs the whole pipeline and
//! is what the table shell calls after every change; [`process`] is the same
//! pipeline returning record references.

pub mod column;
pub mod filter;
pub mod paginate;
pub mod sort;

pub use column::{Cell, CellFormat, CellStyle, ColumnDef, ColumnKind, ColumnSpec, Header};
pub use filter::{filter, filter_with, MatchMode};
pub use paginate::{paginate, ClampPolicy, Page, Pagination};
pub use sort::{apply_sort, sort, SortDirection, SortSpec};

use crate::domain::record::Record;
use column::find_column;
use filter::filter_indices;
use sort::sort_by_column;

/// Output of a full pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed<'a> {
    /// Filtered and sorted rows, before pagination.
    pub visible: Vec<&'a Record>,
    /// Page index after clamping against `visible`.
    pub page_index: usize,
    pub page_count: usize,
}

impl<'a> Processed<'a> {
    /// The rows of the current page.
    #[must_use]
    pub fn page(&self, page_size: usize) -> Page<'_, &'a Record> {
        paginate(&self.visible, self.page_index, page_size)
    }
}

/// Runs `rows → filter → sort` and clamps `pagination` against the result.
///
/// # Examples
///
/// ```
/// use clinic_table::table::{process, ClampPolicy, MatchMode, Pagination, SortSpec};
/// use clinic_table::{ColumnDef, Record};
///
/// let rows: Vec<Record> = (1..=25)
///     .map(|n| Record::new().with("n", n).with("name", format!("Patient {n}")))
///     .collect();
/// let columns = vec![ColumnDef::new("n", "#"), ColumnDef::new("name", "Name")];
/// let mut pagination = Pagination { page_index: 2, page_size: 10 };
///
/// let processed = process(
///     &rows,
///     &columns,
///     "patient 2",
///     MatchMode::Substring,
///     Some(&SortSpec::descending("n")),
///     &mut pagination,
///     ClampPolicy::ResetToFirst,
/// );
/// // "Patient 2" and "Patient 20".."Patient 25" match: one page, index reset.
/// assert_eq!(processed.visible.len(), 7);
/// assert_eq!(pagination.page_index, 0);
/// assert_eq!(processed.visible[0].value("n"), 25);
/// ```
pub fn process<'a>(
    rows: &'a [Record],
    columns: &[ColumnDef],
    query: &str,
    mode: MatchMode,
    sort_spec: Option<&SortSpec>,
    pagination: &mut Pagination,
    policy: ClampPolicy,
) -> Processed<'a> {
    let visible: Vec<&Record> = process_indices(rows, columns, query, mode, sort_spec, pagination, policy)
        .into_iter()
        .map(|index| &rows[index])
        .collect();

    Processed {
        page_index: pagination.page_index,
        page_count: pagination.page_count(visible.len()),
        visible,
    }
}

/// [`process`] over row indices: the positions in `rows` of the filtered and
/// sorted rows, in display order.
///
/// Sorting by an unknown or non-sortable column leaves the filtered order
/// unchanged. `pagination` is clamped against the result before returning.
pub fn process_indices(
    rows: &[Record],
    columns: &[ColumnDef],
    query: &str,
    mode: MatchMode,
    sort_spec: Option<&SortSpec>,
    pagination: &mut Pagination,
    policy: ClampPolicy,
) -> Vec<usize> {
    let matched = filter_indices(rows, columns, query, mode);

    let target = sort_spec.and_then(|spec| {
        find_column(columns, &spec.column_key)
            .filter(|column| column.is_sortable())
            .map(|column| (column, spec.direction))
    });

    let visible = match target {
        Some((column, direction)) => sort_by_column(matched, column, direction, |&index| &rows[index]),
        None => matched,
    };

    pagination.clamp(visible.len(), policy);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|n| Record::new().with("n", n).with("name", format!("Patient {n}")))
            .collect()
    }

    fn columns() -> Vec<ColumnDef> {
        vec![ColumnDef::new("n", "#"), ColumnDef::new("name", "Name")]
    }

    #[test]
    fn indices_are_filtered_then_sorted() {
        let rows = numbered(12);
        let mut pagination = Pagination::with_page_size(10);

        let visible = process_indices(
            &rows,
            &columns(),
            "patient 1",
            MatchMode::Substring,
            Some(&SortSpec::descending("n")),
            &mut pagination,
            ClampPolicy::ResetToFirst,
        );
        // Patient 1, 10, 11, 12 in descending order of n
        assert_eq!(visible, vec![11, 10, 9, 0]);
    }

    #[test]
    fn unsortable_column_keeps_filtered_order() {
        let rows = numbered(3);
        let columns = vec![ColumnDef::new("n", "#").not_sortable()];
        let mut pagination = Pagination::with_page_size(10);

        let visible = process_indices(
            &rows,
            &columns,
            "",
            MatchMode::Substring,
            Some(&SortSpec::descending("n")),
            &mut pagination,
            ClampPolicy::ResetToFirst,
        );
        assert_eq!(visible, vec![0, 1, 2]);
    }

    #[test]
    fn processed_page_follows_clamped_index() {
        let rows = numbered(25);
        let mut pagination = Pagination::with_page_size(10);
        pagination.page_index = 2;

        let processed = process(
            &rows,
            &columns(),
            "",
            MatchMode::Substring,
            None,
            &mut pagination,
            ClampPolicy::LastValid,
        );
        assert_eq!(processed.page_index, 2);
        assert_eq!(processed.page_count, 3);
        assert_eq!(processed.page(10).rows.len(), 5);

        let processed = process(
            &rows[..12],
            &columns(),
            "",
            MatchMode::Substring,
            None,
            &mut pagination,
            ClampPolicy::LastValid,
        );
        assert_eq!(processed.page_index, 1);
        let numbers: Vec<u64> = processed
            .page(10)
            .rows
            .iter()
            .filter_map(|r| r.value("n").as_u64())
            .collect();
        assert_eq!(numbers, vec![11, 12]);
    }
}
