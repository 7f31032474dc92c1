//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the `clinic_table` library
//! and the Zellij plugin system. It implements `ZellijPlugin`, registers the
//! background worker, and translates Zellij events to library events.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← table state, event handling
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │   TableWorker    │   │  ← rows, columns, preferences,
//! │  │ (worker thread)  │   │    report files
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, build the table state
//! 2. **Subscribe**: Register for Key, Mouse, `CustomMessage` events
//! 3. **Permissions granted**: Ask the worker for columns, rows and remembered
//!    preferences
//! 4. **Update**: Handle events, delegate to library layer
//! 5. **Render**: Call library render function, keep the view model for clicks
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+n` / `PageDown` / `Right`: Next page
//! - `Ctrl+p` / `PageUp` / `Left`: Previous page
//! - `Home` / `End`: First / last page
//! - `Down` / `Up`: Scroll one row; past the page edge, change page
//! - `Tab` / `Shift+Tab`: Focus next / previous column
//!
//! In normal mode and while navigating search results:
//! - `/`: Search (focus the search bar)
//! - `j` / `k`: Scroll down / up one row
//! - `h` / `l`: Focus previous / next column
//! - `s` or `Enter`: Cycle sort of the focused column
//! - `1`..`9`: Cycle sort of that column
//! - `n` / `p`: Next / previous page
//! - `g` / `G`: First / last page
//! - `+` / `-`: Larger / smaller page size
//! - `r`: Refresh rows
//! - `P`: Write report
//! - `q`: Close plugin
//!
//! While typing a search:
//! - characters: Edit query
//! - `Enter`: Keep query, return keys to the table
//! - `Esc`: Clear query and close the search bar
//!
//! Mouse: clicking a column header cycles its sort, the wheel scrolls rows.

#![allow(clippy::multiple_crate_versions)]

use clinic_table::ui::UIViewModel;
use clinic_table::worker::{TableWorker, WorkerMessage, WorkerResponse};
use clinic_table::{handle_event, Action, Config, Event, InputMode, SearchFocus};
use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

register_plugin!(State);
register_worker!(TableWorker, table_worker, TABLE_WORKER);

/// Plugin state wrapper.
///
/// Wraps the library's `TableState` with Zellij-specific concerns like worker
/// communication and mouse hit-testing.
struct State {
    app: clinic_table::TableState,

    config: Config,

    /// Worker thread identifier for IPC messaging.
    worker_name: String,

    /// View model of the last frame, for header clicks.
    last_view: Option<UIViewModel>,
}

impl Default for State {
    fn default() -> Self {
        let config = Config::default();
        Self {
            app: clinic_table::initialize(&config),
            config,
            worker_name: "table".to_string(),
            last_view: None,
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, builds the table state, requests permissions and
    /// subscribes to events. Data is requested once permissions are granted.
    ///
    /// # Permissions
    ///
    /// - `ReadApplicationState`, `ChangeApplicationState`: hide the pane
    /// - `FullHdAccess`: read rows and columns files, write reports
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        clinic_table::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(
            rows_file = ?config.rows_file,
            columns_file = ?config.columns_file,
            "parsed configuration"
        );
        self.app = clinic_table::initialize(&config);
        self.config = config;

        request_permission(&[
            PermissionType::ReadApplicationState,
            PermissionType::ChangeApplicationState,
            PermissionType::FullHdAccess,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::Mouse,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Translates Zellij events to library events, delegates to `handle_event`,
    /// and executes resulting actions. Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::Mouse(mouse) => match self.map_mouse_event(mouse) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match self.map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                self.handle_permission_result(permissions);
                return false;
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    self.execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        self.app.set_pane_rows(rows);
        self.last_view = Some(clinic_table::ui::render(&self.app, rows, cols));
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Mouse(mouse) => format!("Mouse({mouse:?})"),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::NextPage);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::PreviousPage);
        }
        if key.bare_key == BareKey::Tab && key.has_modifiers(&[KeyModifier::Shift]) {
            return Some(Event::FocusPreviousColumn);
        }

        let global = match key.bare_key {
            BareKey::PageDown | BareKey::Right => Some(Event::NextPage),
            BareKey::PageUp | BareKey::Left => Some(Event::PreviousPage),
            BareKey::Home => Some(Event::FirstPage),
            BareKey::End => Some(Event::LastPage),
            BareKey::Down => Some(Event::ScrollDown),
            BareKey::Up => Some(Event::ScrollUp),
            BareKey::Tab => Some(Event::FocusNextColumn),
            _ => None,
        };
        if global.is_some() {
            return global;
        }

        match self.app.input_mode {
            InputMode::Search(SearchFocus::Typing) => Self::map_typing_key(key.bare_key),
            InputMode::Search(SearchFocus::Navigating) => match key.bare_key {
                BareKey::Esc => Some(Event::ExitSearch),
                BareKey::Char('/') => Some(Event::FocusSearchBar),
                other => Self::map_command_key(other),
            },
            InputMode::Normal => match key.bare_key {
                BareKey::Esc => Some(Event::CloseFocus),
                BareKey::Char('/') => Some(Event::SearchMode),
                other => Self::map_command_key(other),
            },
        }
    }

    fn map_typing_key(bare_key: BareKey) -> Option<Event> {
        Some(match bare_key {
            BareKey::Esc => Event::ExitSearch,
            BareKey::Enter => Event::FocusResults,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    /// Table commands, shared by normal mode and search-result navigation.
    fn map_command_key(bare_key: BareKey) -> Option<Event> {
        Some(match bare_key {
            BareKey::Char('q') => Event::CloseFocus,
            BareKey::Char('j') => Event::ScrollDown,
            BareKey::Char('k') => Event::ScrollUp,
            BareKey::Char('h') => Event::FocusPreviousColumn,
            BareKey::Char('l') => Event::FocusNextColumn,
            BareKey::Char('s') | BareKey::Enter => Event::SortFocusedColumn,
            BareKey::Char('n') => Event::NextPage,
            BareKey::Char('p') => Event::PreviousPage,
            BareKey::Char('g') => Event::FirstPage,
            BareKey::Char('G') => Event::LastPage,
            BareKey::Char('+' | '=') => Event::NextPageSize,
            BareKey::Char('-') => Event::PreviousPageSize,
            BareKey::Char('r') => Event::Refresh,
            BareKey::Char('P') => Event::Print,
            BareKey::Char(c @ '1'..='9') => {
                let index = c.to_digit(10).map_or(0, |d| d as usize - 1);
                Event::SortColumn(index)
            }
            _ => return None,
        })
    }

    /// Maps mouse events to application events.
    ///
    /// Zellij reports 0-based pane coordinates; the view model uses 1-based
    /// terminal positions.
    fn map_mouse_event(&self, mouse: Mouse) -> Option<Event> {
        match mouse {
            Mouse::LeftClick(line, col) => {
                let line = usize::try_from(line).ok()?;
                let index = self.last_view.as_ref()?.column_at(line + 1, col + 1)?;
                tracing::debug!(column = index, "header clicked");
                Some(Event::SortColumn(index))
            }
            Mouse::ScrollDown(_) => Some(Event::ScrollDown),
            Mouse::ScrollUp(_) => Some(Event::ScrollUp),
            _ => None,
        }
    }

    /// Requests columns, rows and remembered preferences from the worker.
    fn handle_permission_result(&self, permissions: PermissionStatus) {
        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted - loading table data");
                if let Some(path) = &self.config.columns_file {
                    self.post_worker_message(&WorkerMessage::load_columns(path.clone()));
                }
                if let Some(path) = &self.config.rows_file {
                    self.post_worker_message(&WorkerMessage::load_rows(path.clone()));
                }
                if self.config.remember_preferences {
                    self.post_worker_message(&WorkerMessage::load_preferences(
                        self.config.preferences_key(),
                    ));
                }
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - rows and reports unavailable");
            }
        }
    }

    /// Maps custom message events to application events.
    fn map_custom_message_event(&self, message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message != self.worker_name {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Serializes the message as JSON and sends it via Zellij's IPC system.
    /// Serialization errors are logged, not propagated.
    fn post_worker_message(&self, message: &WorkerMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => {
                tracing::debug!(kind = message.kind(), payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(self.worker_name.clone()),
                    name: self.worker_name.clone(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Translates library actions to Zellij API calls and worker messages.
    #[tracing::instrument(level = "debug", skip(self, action))]
    fn execute_action(&self, action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::Refresh => {
                if let Some(path) = &self.config.rows_file {
                    self.post_worker_message(&WorkerMessage::load_rows(path.clone()));
                }
            }
            Action::Print { report } => {
                self.post_worker_message(&WorkerMessage::write_report(
                    self.config.report_path(),
                    report.clone(),
                ));
            }
            Action::PersistPreferences(preferences) => {
                if self.config.remember_preferences {
                    self.post_worker_message(&WorkerMessage::save_preferences(
                        self.config.preferences_key(),
                        preferences.clone(),
                    ));
                }
            }
        }
    }
}
