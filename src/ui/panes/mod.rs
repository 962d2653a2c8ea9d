//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`grid`]: The program grid with cursor and selection highlighting
//! - [`selections`]: The selection stack, top first, plus any open selection
//! - [`machine`]: Cursor, run-vector, step count, last operation and diagnostics
//! - [`terminal`]: Output captured from `print`
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*` function. Scroll offsets are
//! owned by the caller and clamped in place.

pub mod grid;
pub mod machine;
pub mod selections;
pub mod status;
pub mod terminal;

pub use grid::{render_grid_pane, GridView};
pub use machine::render_machine_pane;
pub use selections::render_selections_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

/// Border style shared by every pane
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so that `visible` rows out of `total` stay on screen
fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
