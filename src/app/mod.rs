//! Application layer: the presentation shell around the table engine.
//!
//! Sits between the plugin runtime (`main.rs`) and the engine, storage and
//! worker layers.
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects requested by the handler
//! - [`handler`]: event processing
//! - [`modes`]: input mode state machine
//! - [`state`]: table state, the recompute pipeline and view model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, SearchFocus};
pub use state::{TableProps, TableState};
