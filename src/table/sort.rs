//! Sort engine: stable, per-column-kind ordering.
//!
//! Sorting extracts a [`SortKey`] from every row once, then runs a stable sort
//! on the keys. Keys are totally ordered, so mixed or malformed values can never
//! make the comparator inconsistent: values that do not fit the column kind fall
//! back to case-insensitive string comparison and are ranked after typed values.

use crate::domain::record::{display_string, Record};
use crate::table::column::{find_column, ColumnDef, ColumnKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Next state of the three-state header toggle: none → ascending →
    /// descending → none.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::None => Self::Ascending,
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Ascending => "asc",
            Self::Descending => "desc",
        })
    }
}

/// The active sort of a table: one column and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column_key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column_key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_key: column_key.into(),
            direction,
        }
    }

    pub fn ascending(column_key: impl Into<String>) -> Self {
        Self::new(column_key, SortDirection::Ascending)
    }

    pub fn descending(column_key: impl Into<String>) -> Self {
        Self::new(column_key, SortDirection::Descending)
    }

    /// Computes the sort after a click on the header of `clicked_key`.
    ///
    /// Clicking the sorted column advances its direction and returns `None` once
    /// the cycle reaches "unsorted". Clicking any other column starts ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use clinic_table::{SortDirection, SortSpec};
    ///
    /// let first = SortSpec::cycle(None, "name");
    /// assert_eq!(first, Some(SortSpec::ascending("name")));
    ///
    /// let second = SortSpec::cycle(first.as_ref(), "name");
    /// assert_eq!(second, Some(SortSpec::descending("name")));
    ///
    /// assert_eq!(SortSpec::cycle(second.as_ref(), "name"), None);
    /// assert_eq!(
    ///     SortSpec::cycle(second.as_ref(), "budget"),
    ///     Some(SortSpec::ascending("budget"))
    /// );
    /// ```
    #[must_use]
    pub fn cycle(current: Option<&Self>, clicked_key: &str) -> Option<Self> {
        let direction = match current {
            Some(spec) if spec.column_key == clicked_key => spec.direction.next(),
            _ => SortDirection::Ascending,
        };

        (direction != SortDirection::None).then(|| Self::new(clicked_key, direction))
    }

    /// Direction this spec applies to `column_key`.
    #[must_use]
    pub fn direction_for(spec: Option<&Self>, column_key: &str) -> SortDirection {
        spec.filter(|s| s.column_key == column_key)
            .map_or(SortDirection::None, |s| s.direction)
    }
}

impl FromStr for SortSpec {
    type Err = String;

    /// Parses `key`, `key:asc` or `key:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.split_once(':') {
            Some((key, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" | "ascending" => SortDirection::Ascending,
                    "desc" | "descending" => SortDirection::Descending,
                    other => return Err(format!("unknown sort direction '{other}'")),
                };
                (key.trim(), direction)
            }
            None => (s.trim(), SortDirection::Ascending),
        };

        if key.is_empty() {
            return Err("sort column must not be empty".to_string());
        }

        Ok(Self::new(key, direction))
    }
}

/// Comparable key extracted from one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl SortKey {
    const fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
        }
    }

    /// Total order over keys: missing first, then typed values, then the text
    /// fallback.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Builds the key for a value in a column of the given (resolved) kind.
    #[must_use]
    pub fn from_value(value: &Value, kind: ColumnKind) -> Self {
        if value.is_null() {
            return Self::Missing;
        }

        let typed = match kind {
            ColumnKind::Number => as_number(value).map(Self::Number),
            ColumnKind::Date => as_date(value).map(Self::Date),
            ColumnKind::Text | ColumnKind::Auto => None,
        };

        typed.unwrap_or_else(|| {
            let text = display_string(value);
            if text.trim().is_empty() {
                Self::Missing
            } else {
                Self::Text(text.to_lowercase())
            }
        })
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d %b %Y", "%b %d, %Y"];

/// Parses the date formats seen in clinic data (ISO 8601 / RFC 3339, plain
/// dates, day-first dates, short month names).
///
/// # Examples
///
/// ```
/// use clinic_table::table::sort::parse_date;
///
/// assert!(parse_date("2024-03-01").is_some());
/// assert!(parse_date("2024-03-01T09:30:00Z").is_some());
/// assert!(parse_date("01/03/2024").is_some());
/// assert!(parse_date("next tuesday").is_none());
/// ```
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn as_date(value: &Value) -> Option<NaiveDateTime> {
    value.as_str().and_then(parse_date)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Resolves `ColumnKind::Auto` by inspecting the values being sorted.
///
/// Blank values are ignored. The column is `Number` when more than half of the
/// non-blank values are numeric, else `Date` when more than half parse as
/// dates, else `Text`. Values that do not fit the resolved kind sort through
/// the text fallback of [`SortKey`], after the typed values.
///
/// # Examples
///
/// ```
/// use clinic_table::table::sort::resolve_kind;
/// use clinic_table::{ColumnDef, ColumnKind, Record};
///
/// let rows: Vec<Record> = [serde_json::json!(100), serde_json::json!(9), serde_json::json!("N/A")]
///     .into_iter()
///     .map(|v| Record::new().with("budget", v))
///     .collect();
/// let column = ColumnDef::new("budget", "Budget");
/// assert_eq!(resolve_kind(&column, rows.iter()), ColumnKind::Number);
/// ```
pub fn resolve_kind<'r, I>(column: &ColumnDef, records: I) -> ColumnKind
where
    I: IntoIterator<Item = &'r Record>,
{
    if column.kind != ColumnKind::Auto {
        return column.kind;
    }

    let mut seen = 0usize;
    let mut numbers = 0usize;
    let mut dates = 0usize;

    for record in records {
        let value = column.value(record);
        if is_blank(&value) {
            continue;
        }
        seen += 1;
        if as_number(&value).is_some() {
            numbers += 1;
        } else if as_date(&value).is_some() {
            dates += 1;
        }
    }

    if numbers * 2 > seen {
        ColumnKind::Number
    } else if dates * 2 > seen {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}

/// Stable sort of arbitrary items by one column.
///
/// `record_of` maps an item to its record, which lets the same engine order
/// record references or indices into a row vector. Equal keys keep their input
/// order in both directions.
pub fn sort_by_column<'r, T, F>(
    items: Vec<T>,
    column: &ColumnDef,
    direction: SortDirection,
    record_of: F,
) -> Vec<T>
where
    F: Fn(&T) -> &'r Record,
{
    if direction == SortDirection::None || items.len() < 2 {
        return items;
    }

    let kind = resolve_kind(column, items.iter().map(&record_of));
    let _span = tracing::debug_span!("sort",
        column = %column.accessor_key,
        direction = %direction,
        kind = ?kind,
        rows = items.len()
    )
    .entered();

    let mut keyed: Vec<(SortKey, T)> = items
        .into_iter()
        .map(|item| {
            let key = SortKey::from_value(&column.value(record_of(&item)), kind);
            (key, item)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Descending => b.total_cmp(a),
        _ => a.total_cmp(b),
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Orders rows by one column.
///
/// `SortDirection::None` returns the input order unchanged.
///
/// # Examples
///
/// ```
/// use clinic_table::{sort, ColumnDef, Record, SortDirection};
///
/// let rows: Vec<Record> = [100, 50, 100, 25]
///     .iter()
///     .enumerate()
///     .map(|(i, b)| Record::new().with("id", i).with("budget", *b))
///     .collect();
/// let column = ColumnDef::new("budget", "Budget");
///
/// let sorted = sort(rows.iter().collect(), &column, SortDirection::Descending);
/// let ids: Vec<u64> = sorted.iter().map(|r| r.value("id").as_u64().unwrap()).collect();
/// assert_eq!(ids, vec![0, 2, 1, 3]);
/// ```
#[must_use]
pub fn sort<'a>(rows: Vec<&'a Record>, column: &ColumnDef, direction: SortDirection) -> Vec<&'a Record> {
    sort_by_column(rows, column, direction, |record| *record)
}

/// Applies an optional [`SortSpec`] to a set of rows.
///
/// Unknown or non-sortable columns leave the order unchanged.
#[must_use]
pub fn apply_sort<'a>(rows: Vec<&'a Record>, columns: &[ColumnDef], spec: Option<&SortSpec>) -> Vec<&'a Record> {
    match spec.and_then(|s| find_column(columns, &s.column_key).map(|c| (c, s.direction))) {
        Some((column, direction)) if column.is_sortable() => sort(rows, column, direction),
        _ => rows,
    }
}
