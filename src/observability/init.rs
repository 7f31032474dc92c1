//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file inside the plugin data directory.
pub const LOG_FILE_NAME: &str = "clinic-table.log";

/// Installs the global tracing subscriber.
///
/// Events at or above `config.trace_level` (default `info`) are written as
/// plain text lines to `clinic-table.log` in the plugin data directory, which
/// rotates at 5 MB with three backups.
///
/// Observability is optional: if the data directory cannot be created the
/// function returns without installing anything. Only the first call in a
/// process takes effect.
///
/// # Example
///
/// ```rust,no_run
/// use clinic_table::observability::init_tracing;
/// use clinic_table::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let writer = RotatingFileWriter::new(data_dir.join(LOG_FILE_NAME));

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        );

    let _ = subscriber.try_init();
}
