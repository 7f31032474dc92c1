//! Storage layer for remembered view preferences.
//!
//! # Modules
//!
//! - `backend`: [`PreferenceStore`] trait
//! - `json`: JSON file store used by the plugin worker
//! - `memory`: in-memory store for tests and embedding
//! - `models`: the persisted [`ViewPreferences`] type

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::PreferenceStore;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use models::ViewPreferences;
