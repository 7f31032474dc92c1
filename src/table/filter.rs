//! Filter engine: global free-text search across every column.
//!
//! The default [`MatchMode::Substring`] keeps a row when any column's
//! stringified value contains the query, case-insensitively. [`MatchMode::Fuzzy`]
//! uses skim-style fuzzy matching instead, for lists where users type
//! abbreviations.

use crate::domain::record::Record;
use crate::table::column::ColumnDef;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the global query is matched against cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Substring,
    Fuzzy,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" | "contains" => Ok(Self::Substring),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(format!("unknown match mode '{other}'")),
        }
    }
}

enum Matcher {
    Substring(String),
    Fuzzy(SkimMatcherV2, String),
}

impl Matcher {
    fn new(query: &str, mode: MatchMode) -> Self {
        let needle = query.to_lowercase();
        match mode {
            MatchMode::Substring => Self::Substring(needle),
            MatchMode::Fuzzy => Self::Fuzzy(SkimMatcherV2::default().ignore_case(), needle),
        }
    }

    fn matches(&self, text: &str) -> bool {
        let haystack = text.to_lowercase();
        match self {
            Self::Substring(needle) => haystack.contains(needle.as_str()),
            Self::Fuzzy(matcher, needle) => matcher.fuzzy_match(&haystack, needle).is_some(),
        }
    }

    fn matches_record(&self, record: &Record, columns: &[ColumnDef]) -> bool {
        columns
            .iter()
            .any(|column| self.matches(&column.display_value(record)))
    }
}

/// Indices of the rows matching `query`, in their original order.
///
/// An empty query matches every row.
#[must_use]
pub fn filter_indices(rows: &[Record], columns: &[ColumnDef], query: &str, mode: MatchMode) -> Vec<usize> {
    if query.is_empty() {
        return (0..rows.len()).collect();
    }

    let _span = tracing::debug_span!("filter",
        rows = rows.len(),
        columns = columns.len(),
        query_len = query.len(),
        mode = ?mode
    )
    .entered();

    let matcher = Matcher::new(query, mode);
    let matched: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, record)| matcher.matches_record(record, columns))
        .map(|(index, _)| index)
        .collect();

    tracing::trace!(matched = matched.len(), "filter applied");
    matched
}

/// Rows where at least one column's value contains `query`, case-insensitively.
///
/// Pure and order-preserving. Missing values are treated as the empty string.
///
/// # Examples
///
/// ```
/// use clinic_table::{filter, ColumnDef, Record};
///
/// let rows = vec![
///     Record::new().with("name", "John Doe"),
///     Record::new().with("name", "Mary Jane"),
///     Record::new().with("name", "Jolene Smith"),
/// ];
/// let columns = vec![ColumnDef::new("name", "Name")];
///
/// let names: Vec<&str> = filter(&rows, &columns, "jo")
///     .iter()
///     .filter_map(|r| r.value("name").as_str())
///     .collect();
/// assert_eq!(names, vec!["John Doe", "Jolene Smith"]);
/// ```
#[must_use]
pub fn filter<'a>(rows: &'a [Record], columns: &[ColumnDef], query: &str) -> Vec<&'a Record> {
    filter_with(rows, columns, query, MatchMode::Substring)
}

/// [`filter`] with an explicit match mode.
#[must_use]
pub fn filter_with<'a>(rows: &'a [Record], columns: &[ColumnDef], query: &str, mode: MatchMode) -> Vec<&'a Record> {
    filter_indices(rows, columns, query, mode)
        .into_iter()
        .map(|index| &rows[index])
        .collect()
}

/// Character ranges of `text` matching `query`, for highlighting.
///
/// Ranges are `(start, end)` character indices with exclusive end, non-overlapping
/// and in order. Matching is case-insensitive.
///
/// # Examples
///
/// ```
/// use clinic_table::table::filter::match_ranges;
///
/// assert_eq!(match_ranges("Jo and JO", "jo"), vec![(0, 2), (7, 9)]);
/// assert!(match_ranges("Mary Jane", "jo").is_empty());
/// ```
#[must_use]
pub fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = query.to_lowercase().chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let lowered: Vec<String> = text.chars().map(|c| c.to_lowercase().collect()).collect();
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < lowered.len() {
        if let Some(end) = match_at(&lowered, start, &needle) {
            ranges.push((start, end));
            start = end;
        } else {
            start += 1;
        }
    }

    ranges
}

/// Character ranges of a fuzzy match of `query` in `text`, coalesced into
/// contiguous runs. Empty when the query does not match.
#[must_use]
pub fn fuzzy_match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for index in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == index => *end += 1,
            _ => ranges.push((index, index + 1)),
        }
    }
    ranges
}

/// Returns the exclusive end character index if `needle` matches at `start`.
fn match_at(lowered: &[String], start: usize, needle: &[char]) -> Option<usize> {
    let mut pos = 0;
    let mut index = start;

    while pos < needle.len() {
        let chunk = lowered.get(index)?;
        for c in chunk.chars() {
            if needle.get(pos) != Some(&c) {
                return None;
            }
            pos += 1;
        }
        index += 1;
    }

    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patients() -> Vec<Record> {
        vec![
            Record::from_value(json!({"name": "John Doe", "phone": "98200 11111", "age": 42})),
            Record::from_value(json!({"name": "Mary Jane", "phone": null, "age": 29})),
            Record::from_value(json!({"name": "Jolene Smith", "age": 35})),
            Record::from_value(json!({"name": "Arjun Rao", "phone": "98200 22222", "age": 42})),
        ]
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("phone", "Phone"),
            ColumnDef::new("age", "Age"),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let rows = patients();
        assert_eq!(filter_indices(&rows, &columns(), "", MatchMode::Substring), vec![0, 1, 2, 3]);
    }

    #[test]
    fn matches_any_column_case_insensitively() {
        let rows = patients();
        assert_eq!(filter_indices(&rows, &columns(), "JO", MatchMode::Substring), vec![0, 2]);
        assert_eq!(filter_indices(&rows, &columns(), "22222", MatchMode::Substring), vec![3]);
    }

    #[test]
    fn numbers_are_coerced_to_strings() {
        let rows = patients();
        assert_eq!(filter_indices(&rows, &columns(), "42", MatchMode::Substring), vec![0, 3]);
    }

    #[test]
    fn only_declared_columns_are_searched() {
        let rows = vec![Record::from_value(json!({"name": "A", "notes": "diabetic"}))];
        assert!(filter(&rows, &columns(), "diabetic").is_empty());
    }

    #[test]
    fn no_match_yields_empty() {
        let rows = patients();
        assert!(filter(&rows, &columns(), "zzz").is_empty());
    }

    #[test]
    fn fuzzy_mode_matches_abbreviations() {
        let rows = patients();
        assert_eq!(filter_indices(&rows, &columns(), "jsmth", MatchMode::Fuzzy), vec![2]);
        assert!(filter_indices(&rows, &columns(), "jsmth", MatchMode::Substring).is_empty());
    }

    #[test]
    fn result_is_monotonic_and_correct() {
        let rows = patients();
        let cols = columns();
        for query in ["", "a", "jo", "98200", "mary", "x"] {
            let kept = filter_indices(&rows, &cols, query, MatchMode::Substring);
            assert!(kept.len() <= rows.len());

            let needle = query.to_lowercase();
            for (index, record) in rows.iter().enumerate() {
                let matches = cols
                    .iter()
                    .any(|c| c.display_value(record).to_lowercase().contains(&needle));
                assert_eq!(kept.contains(&index), matches, "query {query:?}, row {index}");
            }
        }
    }

    #[test]
    fn match_ranges_are_char_based() {
        assert_eq!(match_ranges("Ünïcode Ünï", "ünï"), vec![(0, 3), (8, 11)]);
        assert_eq!(match_ranges("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert!(match_ranges("abc", "").is_empty());
    }

    #[test]
    fn fuzzy_ranges_coalesce_runs() {
        assert_eq!(fuzzy_match_ranges("Jolene Smith", "jsm"), vec![(0, 1), (7, 9)]);
        assert!(fuzzy_match_ranges("Mary Jane", "xyz").is_empty());
    }

    #[test]
    fn parses_match_mode() {
        assert_eq!("Fuzzy".parse::<MatchMode>(), Ok(MatchMode::Fuzzy));
        assert_eq!("substring".parse::<MatchMode>(), Ok(MatchMode::Substring));
        assert!("regex".parse::<MatchMode>().is_err());
    }
}
