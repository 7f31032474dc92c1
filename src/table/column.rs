//! Column definitions: how to read, render and sort one field across all rows.
//!
//! A table is configured with a static `Vec<ColumnDef>`. Every other component
//! reads it: the filter engine stringifies each column's value, the sort engine
//! compares them, and the renderer turns them into [`Cell`]s.
//!
//! Columns can be built in code or loaded from a TOML document:
//!
//! ```toml
//! [[columns]]
//! key = "budget"
//! header = "Budget"
//! kind = "number"      # auto | text | number | date
//! cell = "plain"       # plain | badge | link
//! sortable = true
//! class = "align-right"
//! ```

use crate::domain::error::{Result, TableError};
use crate::domain::record::{display_string, Record};
use crate::table::sort::SortDirection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Formats a raw cell value (with access to the whole record) into a [`Cell`].
pub type CellFormatter = Arc<dyn Fn(&Value, &Record) -> Cell + Send + Sync>;

/// Renders a header label given the column's current sort direction.
pub type HeaderRenderer = Arc<dyn Fn(SortDirection) -> String + Send + Sync>;

/// Computes a value for columns that do not map to a single record field.
pub type ComputedAccessor = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Rendered cell content.
///
/// The variants are interpreted by the rendering target: the terminal renderer
/// draws badges with inverted colours and links underlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// A short status label such as "Confirmed" or "Paid".
    Badge(String),
    /// A navigable reference (URL, email, phone number).
    Link {
        /// Text shown in the cell.
        label: String,
        /// Where the link points.
        target: String,
    },
}

impl Cell {
    /// Text shown for this cell, whatever its variant.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Badge(text) => text,
            Self::Link { label, .. } => label,
        }
    }
}

/// How a column turns its value into a [`Cell`].
#[derive(Clone, Default)]
pub enum CellFormat {
    #[default]
    PlainText,
    Badge,
    Link,
    Custom(CellFormatter),
}

impl fmt::Debug for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainText => f.write_str("PlainText"),
            Self::Badge => f.write_str("Badge"),
            Self::Link => f.write_str("Link"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Column header content: fixed text or a render function.
#[derive(Clone)]
pub enum Header {
    Text(String),
    Render(HeaderRenderer),
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// How values in a column are compared when sorting.
///
/// `Auto` inspects the values being sorted: mostly numeric → `Number`, mostly
/// dates → `Date`, anything else → `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Auto,
    Text,
    Number,
    Date,
}

/// Declarative description of one table column.
#[derive(Clone)]
pub struct ColumnDef {
    /// Field name in each record, or the identifier of a computed column.
    pub accessor_key: String,
    pub header: Header,
    pub cell: CellFormat,
    /// Whether clicking the header cycles the sort. Defaults to `true`.
    pub sortable: bool,
    /// Presentation hint passed to the renderer (`align-right`, `align-center`, `dim`).
    pub display_class: Option<String>,
    pub kind: ColumnKind,
    accessor_fn: Option<ComputedAccessor>,
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("accessor_key", &self.accessor_key)
            .field("header", &self.header)
            .field("cell", &self.cell)
            .field("sortable", &self.sortable)
            .field("display_class", &self.display_class)
            .field("kind", &self.kind)
            .field("computed", &self.accessor_fn.is_some())
            .finish()
    }
}

impl ColumnDef {
    /// Creates a sortable plain-text column reading the field `accessor_key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clinic_table::{ColumnDef, Record};
    ///
    /// let column = ColumnDef::new("name", "Name");
    /// let record = Record::new().with("name", "John Doe");
    /// assert_eq!(column.render(&record).text(), "John Doe");
    /// ```
    pub fn new(accessor_key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            accessor_key: accessor_key.into(),
            header: Header::Text(header.into()),
            cell: CellFormat::PlainText,
            sortable: true,
            display_class: None,
            kind: ColumnKind::Auto,
            accessor_fn: None,
        }
    }

    /// Creates a column whose value is computed from the whole record.
    ///
    /// # Examples
    ///
    /// ```
    /// use clinic_table::{ColumnDef, Record};
    /// use serde_json::{json, Value};
    ///
    /// let full_name = ColumnDef::computed("full_name", "Patient", |r: &Record| {
    ///     let first = r.value("first").as_str().unwrap_or_default();
    ///     let last = r.value("last").as_str().unwrap_or_default();
    ///     Value::from(format!("{first} {last}"))
    /// });
    /// let record = Record::new().with("first", "Mary").with("last", "Jane");
    /// assert_eq!(full_name.value(&record).as_ref(), &json!("Mary Jane"));
    /// ```
    pub fn computed<F>(accessor_key: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        let mut column = Self::new(accessor_key, header);
        column.accessor_fn = Some(Arc::new(accessor));
        column
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_cell(mut self, cell: CellFormat) -> Self {
        self.cell = cell;
        self
    }

    /// Uses a custom formatter for this column's cells.
    #[must_use]
    pub fn with_formatter<F>(self, formatter: F) -> Self
    where
        F: Fn(&Value, &Record) -> Cell + Send + Sync + 'static,
    {
        self.with_cell(CellFormat::Custom(Arc::new(formatter)))
    }

    /// Uses a render function for the header label.
    #[must_use]
    pub fn with_header_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(SortDirection) -> String + Send + Sync + 'static,
    {
        self.header = Header::Render(Arc::new(renderer));
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.display_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    #[must_use]
    pub const fn is_sortable(&self) -> bool {
        self.sortable
    }

    #[must_use]
    pub const fn is_computed(&self) -> bool {
        self.accessor_fn.is_some()
    }

    /// Extracts the raw value of this column from a record.
    ///
    /// Never fails: a missing field yields `Value::Null`.
    #[must_use]
    pub fn value<'r>(&self, record: &'r Record) -> Cow<'r, Value> {
        match &self.accessor_fn {
            Some(accessor) => Cow::Owned(accessor(record)),
            None => Cow::Borrowed(record.value(&self.accessor_key)),
        }
    }

    /// The stringified value used by the filter engine.
    #[must_use]
    pub fn display_value(&self, record: &Record) -> String {
        display_string(&self.value(record))
    }

    /// Renders this column's cell for a record.
    #[must_use]
    pub fn render(&self, record: &Record) -> Cell {
        let value = self.value(record);
        match &self.cell {
            CellFormat::PlainText => Cell::Text(display_string(&value)),
            CellFormat::Badge => {
                let text = display_string(&value);
                if text.is_empty() {
                    Cell::Text(text)
                } else {
                    Cell::Badge(text)
                }
            }
            CellFormat::Link => {
                let text = display_string(&value);
                if text.is_empty() {
                    Cell::Text(text)
                } else {
                    Cell::Link {
                        label: text.clone(),
                        target: text,
                    }
                }
            }
            CellFormat::Custom(formatter) => formatter(&value, record),
        }
    }

    /// Header label for the given sort direction of this column.
    #[must_use]
    pub fn header_label(&self, direction: SortDirection) -> String {
        match &self.header {
            Header::Text(text) => text.clone(),
            Header::Render(renderer) => renderer(direction),
        }
    }
}

/// Finds a column by accessor key.
#[must_use]
pub fn find_column<'c>(columns: &'c [ColumnDef], key: &str) -> Option<&'c ColumnDef> {
    columns.iter().find(|c| c.accessor_key == key)
}

/// Serializable column description, the on-disk form of a [`ColumnDef`].
///
/// Computed accessors and custom formatters cannot be expressed here; they are
/// attached in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub cell: CellStyle,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

/// Built-in cell formats available to declarative columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStyle {
    #[default]
    Plain,
    Badge,
    Link,
}

const fn default_sortable() -> bool {
    true
}

impl ColumnSpec {
    /// Builds the column definition this spec describes.
    ///
    /// A missing header is derived from the key (`first_name` → `First Name`).
    #[must_use]
    pub fn to_column(&self) -> ColumnDef {
        let header = self.header.clone().unwrap_or_else(|| humanize(&self.key));
        let cell = match self.cell {
            CellStyle::Plain => CellFormat::PlainText,
            CellStyle::Badge => CellFormat::Badge,
            CellStyle::Link => CellFormat::Link,
        };

        let mut column = ColumnDef::new(self.key.clone(), header)
            .with_kind(self.kind)
            .with_cell(cell);
        column.sortable = self.sortable;
        column.display_class.clone_from(&self.class);
        column
    }
}

#[derive(Debug, Deserialize)]
struct ColumnsDocument {
    #[serde(default)]
    columns: Vec<ColumnSpec>,
}

/// Parses and validates a TOML columns document.
///
/// # Errors
///
/// Returns [`TableError::Columns`] if the document is malformed, a key is empty
/// or contains a `.`, or two columns share a key.
pub fn parse_column_specs(toml_str: &str) -> Result<Vec<ColumnSpec>> {
    let document: ColumnsDocument = toml::from_str(toml_str)
        .map_err(|e| TableError::Columns(format!("failed to parse columns TOML: {e}")))?;

    let mut seen = HashSet::new();
    for spec in &document.columns {
        if spec.key.trim().is_empty() {
            return Err(TableError::Columns("column key must not be empty".to_string()));
        }
        if spec.key.contains('.') {
            return Err(TableError::Columns(format!(
                "column key '{}' must not contain '.'",
                spec.key
            )));
        }
        if !seen.insert(spec.key.as_str()) {
            return Err(TableError::Columns(format!("duplicate column key '{}'", spec.key)));
        }
    }

    tracing::debug!(column_count = document.columns.len(), "column specs parsed");
    Ok(document.columns)
}

/// Reads a TOML columns file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails [`parse_column_specs`].
pub fn load_column_specs<P: AsRef<Path>>(path: P) -> Result<Vec<ColumnSpec>> {
    let contents = std::fs::read_to_string(path)?;
    parse_column_specs(&contents)
}

/// Parses a TOML columns document straight into column definitions.
///
/// # Errors
///
/// See [`parse_column_specs`].
pub fn columns_from_toml(toml_str: &str) -> Result<Vec<ColumnDef>> {
    Ok(parse_column_specs(toml_str)?
        .iter()
        .map(ColumnSpec::to_column)
        .collect())
}

/// Derives plain columns from the keys of the first record.
///
/// Used when no column definitions were supplied.
#[must_use]
pub fn infer_columns(rows: &[Record]) -> Vec<ColumnDef> {
    rows.first()
        .map(|first| {
            first
                .keys()
                .map(|key| ColumnDef::new(key, humanize(key)))
                .collect()
        })
        .unwrap_or_default()
}

/// Turns a field key into a header label: `last_visit_at` → `Last Visit At`.
#[must_use]
pub fn humanize(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_accessor_renders_empty() {
        let column = ColumnDef::new("nonexistent", "Nope").with_cell(CellFormat::Badge);
        let record = Record::new().with("name", "John");
        assert_eq!(column.render(&record), Cell::Text(String::new()));
        assert_eq!(column.display_value(&record), "");
    }

    #[test]
    fn badge_and_link_cells() {
        let record = Record::new()
            .with("status", "Confirmed")
            .with("email", "jo@clinic.example");

        let badge = ColumnDef::new("status", "Status").with_cell(CellFormat::Badge);
        assert_eq!(badge.render(&record), Cell::Badge("Confirmed".to_string()));

        let link = ColumnDef::new("email", "Email").with_cell(CellFormat::Link);
        assert_eq!(
            link.render(&record),
            Cell::Link {
                label: "jo@clinic.example".to_string(),
                target: "jo@clinic.example".to_string(),
            }
        );
    }

    #[test]
    fn custom_formatter_sees_record() {
        let column = ColumnDef::new("qty", "Stock").with_formatter(|value, record| {
            let unit = record.value("unit").as_str().unwrap_or("pcs");
            Cell::Text(format!("{} {unit}", display_string(value)))
        });
        let record = Record::new().with("qty", 12).with("unit", "strips");
        assert_eq!(column.render(&record).text(), "12 strips");
    }

    #[test]
    fn header_renderer_receives_direction() {
        let column = ColumnDef::new("date", "Date").with_header_renderer(|direction| match direction {
            SortDirection::Ascending => "Date (oldest)".to_string(),
            SortDirection::Descending => "Date (newest)".to_string(),
            SortDirection::None => "Date".to_string(),
        });
        assert_eq!(column.header_label(SortDirection::None), "Date");
        assert_eq!(column.header_label(SortDirection::Descending), "Date (newest)");
    }

    #[test]
    fn computed_column_value() {
        let column = ColumnDef::computed("total", "Total", |r| {
            let qty = r.value("qty").as_f64().unwrap_or(0.0);
            let price = r.value("price").as_f64().unwrap_or(0.0);
            json!(qty * price)
        });
        let record = Record::new().with("qty", 2).with("price", 12.5);
        assert_eq!(column.display_value(&record), "25.0");
        assert!(column.is_computed());
    }

    #[test]
    fn parses_columns_document() {
        let columns = columns_from_toml(
            r#"
            [[columns]]
            key = "patient_name"

            [[columns]]
            key = "budget"
            header = "Budget"
            kind = "number"
            class = "align-right"

            [[columns]]
            key = "status"
            cell = "badge"
            sortable = false
            "#,
        )
        .unwrap();

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].header_label(SortDirection::None), "Patient Name");
        assert_eq!(columns[1].kind, ColumnKind::Number);
        assert_eq!(columns[1].display_class.as_deref(), Some("align-right"));
        assert!(!columns[2].is_sortable());
        assert!(matches!(columns[2].cell, CellFormat::Badge));
    }

    #[test]
    fn rejects_dotted_and_duplicate_keys() {
        let dotted = parse_column_specs("[[columns]]\nkey = \"patient.name\"\n");
        assert!(matches!(dotted, Err(TableError::Columns(_))));

        let duplicate = parse_column_specs("[[columns]]\nkey = \"a\"\n[[columns]]\nkey = \"a\"\n");
        assert!(matches!(duplicate, Err(TableError::Columns(_))));
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = parse_column_specs("[[columns]]\nkey = \"a\"\nkind = \"currency\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn infers_columns_from_first_record() {
        let rows = vec![Record::from_value(json!({"first_name": "A", "visit-date": "2024-01-01"}))];
        let columns = infer_columns(&rows);
        let headers: Vec<String> = columns
            .iter()
            .map(|c| c.header_label(SortDirection::None))
            .collect();
        assert_eq!(headers, vec!["First Name", "Visit Date"]);
        assert!(infer_columns(&[]).is_empty());
    }
}
