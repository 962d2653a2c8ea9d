//! Grid pane rendering
//!
//! Draws the visible window of the program grid as fixed-width cells with a
//! coordinate header and gutter. The cursor cell is drawn as a solid block,
//! cells covered by the top selection and by deeper selections get their own
//! backgrounds, and the start of an open selection is underlined.
//!
//! The window follows the cursor until the user scrolls it by hand; the next
//! step re-enables following.

use super::{border_style, clamp_scroll};
use crate::grid::{Cell, Grid, Vec2};
use crate::selection::SelectionStack;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Characters per cell, including the separating space
const CELL_WIDTH: usize = 7;

/// Characters reserved for the row-number gutter
const GUTTER_WIDTH: usize = 5;

/// Scroll state of the grid pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridView {
    /// First visible row
    pub row: usize,
    /// First visible column
    pub col: usize,
    /// Keep the cursor in view
    pub follow_cursor: bool,
}

impl Default for GridView {
    fn default() -> Self {
        GridView {
            row: 0,
            col: 0,
            follow_cursor: true,
        }
    }
}

/// Short text shown for a cell
pub fn cell_label(cell: &Cell) -> String {
    let label = match cell {
        Cell::Nil => "·".to_string(),
        Cell::Op(op) => op.keyword().to_string(),
        Cell::Number(n) => n.to_string(),
        Cell::Char('\n') => "'\\n".to_string(),
        Cell::Char(' ') => "'\\s".to_string(),
        Cell::Char(c) => format!("'{}", c),
    };

    let max = CELL_WIDTH - 1;
    if label.chars().count() > max {
        let mut short: String = label.chars().take(max - 1).collect();
        short.push('…');
        short
    } else {
        label
    }
}

fn cell_style(cell: &Cell) -> Style {
    match cell {
        Cell::Nil => Style::default().fg(DEFAULT_THEME.comment),
        Cell::Op(_) => Style::default()
            .fg(DEFAULT_THEME.operation)
            .add_modifier(Modifier::BOLD),
        Cell::Number(_) => Style::default().fg(DEFAULT_THEME.number),
        Cell::Char(_) => Style::default().fg(DEFAULT_THEME.character),
    }
}

/// Keep `start..start + visible` around `target`
fn follow(start: &mut usize, target: usize, visible: usize) {
    if target < *start {
        *start = target;
    } else if target >= *start + visible {
        *start = target + 1 - visible;
    }
}

/// Render the grid pane
pub fn render_grid_pane(
    frame: &mut Frame,
    area: Rect,
    grid: &Grid,
    cursor: Vec2,
    selections: &SelectionStack,
    is_focused: bool,
    view: &mut GridView,
) {
    let block = Block::default()
        .title(format!(" Grid {}x{} ", grid.height(), grid.width()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_cols = (inner_width.saturating_sub(GUTTER_WIDTH) / CELL_WIDTH).max(1);
    // Borders and the header row
    let visible_rows = (area.height.saturating_sub(3) as usize).max(1);

    if view.follow_cursor && grid.contains(cursor) {
        follow(&mut view.row, cursor.y as usize, visible_rows);
        follow(&mut view.col, cursor.x as usize, visible_cols);
    }
    clamp_scroll(&mut view.row, grid.height(), visible_rows);
    clamp_scroll(&mut view.col, grid.width(), visible_cols);

    let last_col = (view.col + visible_cols).min(grid.width());
    let last_row = (view.row + visible_rows).min(grid.height());

    let mut lines = Vec::with_capacity(visible_rows + 1);

    let mut header = vec![Span::raw(" ".repeat(GUTTER_WIDTH))];
    for x in view.col..last_col {
        header.push(Span::styled(
            format!("{:<width$}", x, width = CELL_WIDTH),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    lines.push(Line::from(header));

    let top = selections.peek().ok();
    let open_start = selections.open_start();

    for y in view.row..last_row {
        let mut spans = vec![Span::styled(
            format!("{:>width$} ", y, width = GUTTER_WIDTH - 1),
            Style::default().fg(DEFAULT_THEME.comment),
        )];

        for (x, cell) in grid.row(y).iter().enumerate().take(last_col).skip(view.col) {
            let position = Vec2::new(x as i64, y as i64);
            let mut style = cell_style(cell);

            if position == cursor {
                style = style
                    .bg(DEFAULT_THEME.cursor_bg)
                    .fg(ratatui::style::Color::Black);
            } else if top.is_some_and(|s| s.contains(position)) {
                style = style.bg(DEFAULT_THEME.selection_bg);
            } else if selections.iter().skip(1).any(|s| s.contains(position)) {
                style = style.bg(DEFAULT_THEME.stacked_selection_bg);
            }
            if open_start == Some(position) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }

            spans.push(Span::styled(
                format!("{:<width$}", cell_label(cell), width = CELL_WIDTH - 1),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
