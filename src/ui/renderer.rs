//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute a [`UIViewModel`] from the table state, then
//! hand it to the components, which print ANSI-styled text to stdout.

use crate::app::TableState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders the table to stdout and returns the view model that was drawn.
///
/// The returned view model carries the column geometry used for mouse
/// hit-testing on the next click.
pub fn render(state: &TableState, rows: usize, cols: usize) -> UIViewModel {
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.theme, rows, cols);
    viewmodel
}

/// Renders a pre-computed view model.
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows, cols, body_rows = vm.rows.len()).entered();
    components::render_table_view(vm, theme, cols, rows);
}
