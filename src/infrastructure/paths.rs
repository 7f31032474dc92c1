//! Path helpers for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, which usually
//! maps to the directory Zellij was started from (typically the home directory).
//! Paths in plugin configuration are written as the user sees them, so they are
//! translated here before any file I/O.

use std::path::PathBuf;

/// Returns the directory holding the preference store, the log file and the
/// default print report.
///
/// # Examples
///
/// ```
/// use clinic_table::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/clinic-table");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("clinic-table")
}

/// Expands tilde paths to use the `/host` prefix.
///
/// # Examples
///
/// ```
/// use clinic_table::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/clinic/patients.json"), "/host/clinic/patients.json");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

/// Removes the `/host` prefix from sandbox paths for display.
///
/// # Examples
///
/// ```
/// use clinic_table::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/clinic/report.txt"), "/clinic/report.txt");
/// assert_eq!(strip_host_prefix("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    path.strip_prefix("/host").unwrap_or(path).to_string()
}

/// Resolves a user-supplied file path to its sandbox location.
///
/// Tilde paths map under `/host`. Relative paths are taken relative to `/host`
/// as well, since the plugin's own working directory is not meaningful to users.
///
/// # Examples
///
/// ```
/// use clinic_table::infrastructure::resolve_user_path;
///
/// assert_eq!(resolve_user_path("~/rows.json"), "/host/rows.json");
/// assert_eq!(resolve_user_path("clinic/rows.json"), "/host/clinic/rows.json");
/// assert_eq!(resolve_user_path("/data/rows.json"), "/data/rows.json");
/// ```
#[must_use]
pub fn resolve_user_path(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('~') {
        expand_tilde(path)
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/host/{path}")
    }
}
