//! Error types for the table engine and its plugin front end.
//!
//! This module defines the centralized error type [`TableError`] and a type alias
//! [`Result`] used throughout the crate. The engine itself is infallible; errors
//! only come from loading rows, columns and themes, from the preference store, and
//! from worker communication.

use thiserror::Error;

/// The main error type for table operations.
///
/// Most variants carry a description of what went wrong. I/O and JSON errors
/// convert automatically through `#[from]`.
///
/// # Examples
///
/// ```
/// use clinic_table::TableError;
///
/// fn validate_page_sizes(sizes: &[usize]) -> Result<(), TableError> {
///     if sizes.is_empty() {
///         return Err(TableError::Config("page_sizes must not be empty".to_string()));
///     }
///     Ok(())
/// }
/// assert!(validate_page_sizes(&[]).is_err());
/// ```
#[derive(Debug, Error)]
pub enum TableError {
    /// Preference store operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rows file or worker payload was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Column definitions could not be parsed.
    ///
    /// Occurs when a columns TOML document is malformed or declares an unknown
    /// column kind or cell format.
    #[error("Column definition error: {0}")]
    Columns(String),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
