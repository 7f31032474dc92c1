//! File-based logging for the plugin.
//!
//! Zellij plugins have no usable stderr, so `tracing` output goes to a rotating
//! log file in the plugin data directory:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RotatingFileWriter → clinic-table.log
//! ```
//!
//! The level comes from the `trace_level` plugin option, default `info`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: size-based rotating writer

pub mod file_writer;
mod init;

pub use file_writer::RotatingFileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
