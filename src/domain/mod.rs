//! Domain layer: records and errors.
//!
//! This module holds the types every other layer shares, independent of Zellij
//! APIs or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: The opaque row type and its value coercions
//!
//! # Examples
//!
//! ```
//! use clinic_table::domain::{Record, Result};
//!
//! fn patient() -> Result<Record> {
//!     Ok(Record::from_json(r#"{"name": "John Doe", "age": 42}"#)?)
//! }
//! assert_eq!(patient().unwrap().len(), 2);
//! ```

pub mod error;
pub mod record;

pub use error::{Result, TableError};
pub use record::{display_string, load_rows, parse_rows, Record};
