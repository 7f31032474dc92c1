//! Pagination engine: bounded page slices and page-index bookkeeping.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size selector.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Where the page index goes when it falls beyond the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Back to the first page.
    #[default]
    ResetToFirst,
    /// To the last valid page, keeping the view close to where it was.
    LastValid,
}

impl FromStr for ClampPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "reset_to_first" => Ok(Self::ResetToFirst),
            "last" | "last_valid" => Ok(Self::LastValid),
            other => Err(format!("unknown clamp policy '{other}'")),
        }
    }
}

/// Number of pages needed for `total_rows`. Never less than 1.
///
/// # Examples
///
/// ```
/// use clinic_table::table::paginate::page_count;
///
/// assert_eq!(page_count(25, 10), 3);
/// assert_eq!(page_count(20, 10), 2);
/// assert_eq!(page_count(0, 10), 1);
/// ```
#[must_use]
pub const fn page_count(total_rows: usize, page_size: usize) -> usize {
    let size = if page_size == 0 { 1 } else { page_size };
    let pages = total_rows / size + if total_rows % size == 0 { 0 } else { 1 };
    if pages == 0 {
        1
    } else {
        pages
    }
}

/// One page of rows plus the numbers the footer displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    pub page_index: usize,
    pub page_count: usize,
    /// 1-based number of the first row on this page, 0 when the page is empty.
    pub start_row_number: usize,
    /// 1-based number of the last row on this page, 0 when the page is empty.
    pub end_row_number: usize,
    pub total_rows: usize,
}

impl<T> Page<'_, T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Slices `rows` into the page at `page_index`.
///
/// The slice is clamped to the available rows, so an out-of-range index yields
/// an empty page rather than panicking.
///
/// # Examples
///
/// ```
/// use clinic_table::paginate;
///
/// let rows: Vec<u32> = (1..=25).collect();
/// let page = paginate(&rows, 2, 10);
/// assert_eq!(page.rows, &[21, 22, 23, 24, 25]);
/// assert_eq!(page.page_count, 3);
/// assert_eq!((page.start_row_number, page.end_row_number), (21, 25));
/// assert!(!page.has_next());
/// ```
#[must_use]
pub fn paginate<T>(rows: &[T], page_index: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total_rows = rows.len();
    let start = page_index.saturating_mul(size).min(total_rows);
    let end = start.saturating_add(size).min(total_rows);
    let page_rows = &rows[start..end];

    let (start_row_number, end_row_number) = if page_rows.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        rows: page_rows,
        page_index,
        page_count: page_count(total_rows, size),
        start_row_number,
        end_row_number,
        total_rows,
    }
}

/// Page index and page size of a table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Creates a pagination on the first page. A zero size becomes 1.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn page_count(&self, total_rows: usize) -> usize {
        page_count(total_rows, self.page_size)
    }

    /// Advances one page. Returns `false` (and changes nothing) on the last page.
    pub fn next_page(&mut self, total_rows: usize) -> bool {
        if self.page_index + 1 >= self.page_count(total_rows) {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn first_page(&mut self) -> bool {
        let changed = self.page_index != 0;
        self.page_index = 0;
        changed
    }

    pub fn last_page(&mut self, total_rows: usize) -> bool {
        let last = self.page_count(total_rows) - 1;
        let changed = self.page_index != last;
        self.page_index = last;
        changed
    }

    /// Changes the page size. Page boundaries shift, so the index resets to the
    /// first page whenever the size actually changes.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page_index = 0;
        true
    }

    /// Pulls an out-of-range page index back into `[0, page_count)`.
    ///
    /// Indexes that are still valid are left alone. Returns `true` if the index
    /// moved.
    pub fn clamp(&mut self, total_rows: usize, policy: ClampPolicy) -> bool {
        let pages = self.page_count(total_rows);
        if self.page_index < pages {
            return false;
        }

        let clamped = match policy {
            ClampPolicy::ResetToFirst => 0,
            ClampPolicy::LastValid => pages - 1,
        };
        tracing::debug!(
            from = self.page_index,
            to = clamped,
            total_rows,
            policy = ?policy,
            "page index clamped"
        );
        self.page_index = clamped;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_rows_make_three_pages() {
        let rows: Vec<usize> = (1..=25).collect();
        let mut pagination = Pagination::default();

        assert!(pagination.next_page(rows.len()));
        assert!(pagination.next_page(rows.len()));
        assert_eq!(pagination.page_index, 2);

        let page = paginate(&rows, pagination.page_index, pagination.page_size);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows.first(), Some(&21));

        assert!(!pagination.next_page(rows.len()));
        assert_eq!(pagination.page_index, 2);
    }

    #[test]
    fn previous_page_is_noop_on_first() {
        let mut pagination = Pagination::default();
        assert!(!pagination.previous_page());
        assert_eq!(pagination.page_index, 0);
    }

    #[test]
    fn empty_set_is_page_one_of_one() {
        let rows: Vec<u8> = Vec::new();
        let page = paginate(&rows, 0, 10);
        assert_eq!(page.page_count, 1);
        assert!(page.is_empty());
        assert_eq!((page.start_row_number, page.end_row_number), (0, 0));
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn out_of_range_index_yields_empty_slice() {
        let rows = [1, 2, 3];
        let page = paginate(&rows, 7, 2);
        assert!(page.rows.is_empty());
        assert_eq!(page.page_count, 2);
    }

    #[test]
    fn pages_cover_every_row_exactly_once() {
        for total in [0usize, 1, 9, 10, 11, 25, 50] {
            for size in [1usize, 3, 10, 20] {
                let rows: Vec<usize> = (0..total).collect();
                let pages = page_count(total, size);
                let joined: Vec<usize> = (0..pages)
                    .flat_map(|index| paginate(&rows, index, size).rows.to_vec())
                    .collect();
                assert_eq!(joined, rows, "total {total}, size {size}");
            }
        }
    }

    #[test]
    fn clamp_keeps_valid_index() {
        let mut pagination = Pagination {
            page_index: 2,
            page_size: 10,
        };
        assert!(!pagination.clamp(21, ClampPolicy::ResetToFirst));
        assert_eq!(pagination.page_index, 2);
    }

    #[test]
    fn clamp_resets_or_keeps_last_valid() {
        let mut reset = Pagination {
            page_index: 2,
            page_size: 10,
        };
        assert!(reset.clamp(15, ClampPolicy::ResetToFirst));
        assert_eq!(reset.page_index, 0);

        let mut last = Pagination {
            page_index: 4,
            page_size: 10,
        };
        assert!(last.clamp(15, ClampPolicy::LastValid));
        assert_eq!(last.page_index, 1);

        let mut empty = Pagination {
            page_index: 3,
            page_size: 10,
        };
        empty.clamp(0, ClampPolicy::LastValid);
        assert_eq!(empty.page_index, 0);
    }

    #[test]
    fn page_size_change_resets_index() {
        let mut pagination = Pagination {
            page_index: 1,
            page_size: 10,
        };
        assert!(!pagination.set_page_size(10));
        assert_eq!(pagination.page_index, 1);

        assert!(pagination.set_page_size(20));
        assert_eq!(pagination.page_index, 0);

        pagination.set_page_size(0);
        assert_eq!(pagination.page_size, 1);
    }

    #[test]
    fn last_and_first_page() {
        let mut pagination = Pagination::default();
        assert!(pagination.last_page(35));
        assert_eq!(pagination.page_index, 3);
        assert!(!pagination.last_page(35));
        assert!(pagination.first_page());
        assert_eq!(pagination.page_index, 0);
    }

    #[test]
    fn parses_clamp_policy() {
        assert_eq!("last".parse::<ClampPolicy>(), Ok(ClampPolicy::LastValid));
        assert_eq!("FIRST".parse::<ClampPolicy>(), Ok(ClampPolicy::ResetToFirst));
        assert!("middle".parse::<ClampPolicy>().is_err());
    }
}
