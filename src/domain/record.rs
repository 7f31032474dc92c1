//! The opaque row type displayed by the table.
//!
//! A [`Record`] maps field names to JSON values. The table reads records through
//! column accessors and never mutates them. Records come from the caller, usually
//! a JSON array fetched from a backend and written to disk.

use crate::domain::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

static NULL: Value = Value::Null;

/// One row of table data.
///
/// Identity is positional: the table does not require a unique key. Any JSON
/// value that is not an object becomes an empty record, so a malformed element in
/// a rows file renders as a row of empty cells instead of failing the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a record from an arbitrary JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use clinic_table::Record;
    /// use serde_json::json;
    ///
    /// let record = Record::from_value(json!({"name": "Mary Jane"}));
    /// assert_eq!(record.value("name"), &json!("Mary Jane"));
    ///
    /// let not_an_object = Record::from_value(json!(42));
    /// assert!(not_an_object.is_empty());
    /// ```
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                tracing::debug!(value = %other, "non-object row treated as empty record");
                Self::new()
            }
        }
    }

    /// Parses a single record from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Value>(json).map(Self::from_value)
    }

    /// Looks up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Looks up a field, returning `Value::Null` when it is absent.
    #[must_use]
    pub fn value(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }

    /// Inserts or replaces a field, returning the record for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Converts a cell value to the string used for display, filtering and the
/// fallback sort comparison.
///
/// - `null` → empty string
/// - strings → verbatim
/// - numbers and booleans → their JSON text
/// - arrays and objects → compact JSON
///
/// # Examples
///
/// ```
/// use clinic_table::display_string;
/// use serde_json::json;
///
/// assert_eq!(display_string(&json!(null)), "");
/// assert_eq!(display_string(&json!("Jolene")), "Jolene");
/// assert_eq!(display_string(&json!(12.5)), "12.5");
/// assert_eq!(display_string(&json!({"city": "Pune"})), r#"{"city":"Pune"}"#);
/// ```
#[must_use]
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Parses a rows document.
///
/// A JSON array yields one record per element. Any other JSON document (an
/// object, a string, `null`) yields zero rows so the table shows its empty state
/// while the caller is still loading.
///
/// # Errors
///
/// Returns an error only if `json` is not valid JSON.
pub fn parse_rows(json: &str) -> Result<Vec<Record>> {
    let document: Value = serde_json::from_str(json)?;

    let rows = match document {
        Value::Array(items) => items.into_iter().map(Record::from_value).collect(),
        other => {
            tracing::warn!(kind = value_kind(&other), "rows document is not an array, using zero rows");
            Vec::new()
        }
    };

    Ok(rows)
}

/// Reads and parses a rows file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("load_rows", path = %path.display()).entered();

    let contents = std::fs::read_to_string(path)?;
    let rows = parse_rows(&contents)?;

    tracing::debug!(row_count = rows.len(), "rows loaded");
    Ok(rows)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_field_reads_as_null() {
        let record = Record::new().with("name", "John Doe");
        assert_eq!(record.value("phone"), &Value::Null);
        assert!(record.get("phone").is_none());
    }

    #[test]
    fn parse_rows_accepts_array() {
        let rows = parse_rows(r#"[{"name": "a"}, {"name": "b"}, 7]"#).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn parse_rows_non_array_is_zero_rows() {
        assert!(parse_rows(r#"{"data": []}"#).unwrap().is_empty());
        assert!(parse_rows("null").unwrap().is_empty());
        assert!(parse_rows(r#""loading""#).unwrap().is_empty());
    }

    #[test]
    fn parse_rows_rejects_invalid_json() {
        assert!(parse_rows("[{").is_err());
    }

    #[test]
    fn load_rows_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.json");
        std::fs::write(&path, r#"[{"name": "Lead A", "budget": 100}]"#).unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value("budget"), &json!(100));
    }

    #[test]
    fn display_string_bool() {
        assert_eq!(display_string(&json!(true)), "true");
    }

    #[test]
    fn record_keeps_key_order() {
        let record = Record::from_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
