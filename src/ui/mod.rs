//! User interface rendering layer.
//!
//! ```text
//! TableState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: renderable table state
//! - [`renderer`]: top-level rendering coordinator
//! - [`components`]: one renderer per screen region
//! - [`helpers`]: measurement, padding and highlight utilities
//! - [`report`]: plain-text report for printing
//! - [`theme`]: color schemes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod report;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    Align, CellKind, ColumnHeader, DisplayCell, DisplayRow, EmptyState, FooterInfo, HeaderInfo,
    PaginationInfo, SearchBarInfo, UIViewModel,
};
