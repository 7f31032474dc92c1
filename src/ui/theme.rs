//! Theme management and ANSI escape sequence generation.
//!
//! Two built-in themes ship with the plugin, `clinic-dark` (default) and
//! `clinic-light`. Custom themes are TOML files of the same shape.
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#e6edf3"
//! header_bg = "#1f6feb"          # optional
//! selection_fg = "#0d1117"       # focused column header
//! selection_bg = "#58a6ff"
//! text_normal = "#c9d1d9"
//! text_dim = "#6e7681"
//! border = "#30363d"
//! search_bar_border = "#58a6ff"
//! match_highlight_fg = "#0d1117"
//! match_highlight_bg = "#e3b341"
//! empty_state_fg = "#79c0ff"
//! badge_fg = "#0d1117"
//! badge_bg = "#3fb950"
//! link_fg = "#58a6ff"
//! sort_indicator_fg = "#d2a8ff"
//! status_fg = "#3fb950"
//! ```
//!
//! # Example
//!
//! ```rust
//! use clinic_table::ui::theme::Theme;
//!
//! let theme = Theme::from_name("clinic-light").unwrap();
//! print!("{}", Theme::fg(&theme.colors.header_fg));
//! print!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use crate::domain::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme used by every component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Color definitions as hex strings (`"#c9d1d9"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Title and column header text.
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Focused column header.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, disabled pagination controls, `dim` columns.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Badge cells.
    pub badge_fg: String,
    pub badge_bg: String,

    /// Link cells.
    pub link_fg: String,

    /// Sort affordance next to header labels.
    pub sort_indicator_fg: String,

    /// One-shot footer messages (report written, load failure).
    pub status_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name: `clinic-dark` or `clinic-light`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clinic_table::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::from_name("clinic-dark").unwrap().name, "clinic-dark");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "clinic-dark" => include_str!("../../themes/clinic-dark.toml"),
            "clinic-light" => include_str!("../../themes/clinic-light.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Parses a theme from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Theme`] on invalid syntax or missing colors.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| TableError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TableError::Theme(format!("Failed to read theme file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Converts a hex color to an RGB tuple, white on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground color escape sequence.
    ///
    /// ```rust
    /// use clinic_table::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn underline() -> &'static str {
        "\u{001b}[4m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns `clinic-dark`.
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse (should never occur).
    fn default() -> Self {
        Self::from_name("clinic-dark").expect("Built-in clinic-dark theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_themes_parse() {
        assert_eq!(Theme::default().name, "clinic-dark");
        let light = Theme::from_name("clinic-light").unwrap();
        assert!(light.colors.header_bg.is_none());
    }

    #[test]
    fn invalid_hex_falls_back_to_white() {
        assert_eq!(Theme::fg("#12"), "\u{1b}[38;2;255;255;255m");
        assert_eq!(Theme::bg("zzzzzz"), "\u{1b}[48;2;255;255;255m");
    }

    #[test]
    fn missing_color_is_a_theme_error() {
        let err = Theme::from_toml("name = \"broken\"\n[colors]\nheader_fg = \"#ffffff\"\n").unwrap_err();
        assert!(matches!(err, TableError::Theme(_)));
    }

    #[test]
    fn theme_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut theme = Theme::default();
        theme.name = "custom".to_string();
        fs::write(&path, toml::to_string(&theme).unwrap()).unwrap();

        assert_eq!(Theme::from_file(&path).unwrap(), theme);
        assert!(Theme::from_file(dir.path().join("missing.toml")).is_err());
    }
}
