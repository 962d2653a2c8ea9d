//! Machine state pane: registers, run state and diagnostics

use super::{border_style, clamp_scroll};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

fn field<'a>(name: &'a str, value: String, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{:<10}", name),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(value, value_style),
    ])
}

/// Render the machine state pane.
///
/// `fault` is shown only when the displayed state is the one the fault
/// was raised in.
pub fn render_machine_pane(
    frame: &mut Frame,
    area: Rect,
    interpreter: &Interpreter,
    fault: Option<&RuntimeError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Machine ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused))
        .padding(Padding::new(1, 0, 0, 0));

    let plain = Style::default().fg(DEFAULT_THEME.fg);
    let cursor = interpreter.cursor();

    let under_cursor = match interpreter.grid().get_at(cursor) {
        Ok(cell) => format!("{} ({})", cell, cell.kind()),
        Err(_) => "off grid".to_string(),
    };
    let last_op = interpreter
        .last_op()
        .map_or_else(|| "-".to_string(), |op| format!("<{}>", op));

    let (state, state_style) = if let Some(err) = fault {
        (format!("fault: {}", err), Style::default().fg(DEFAULT_THEME.error))
    } else if interpreter.is_halted() {
        ("halted".to_string(), Style::default().fg(DEFAULT_THEME.success))
    } else {
        ("running".to_string(), Style::default().fg(DEFAULT_THEME.primary))
    };

    let mut lines = vec![
        field("cursor", cursor.to_string(), plain.add_modifier(Modifier::BOLD)),
        field("run", interpreter.run_vector().to_string(), plain),
        field("cell", under_cursor, plain),
        field(
            "selecting",
            interpreter
                .selections()
                .open_start()
                .map_or_else(|| "no".to_string(), |start| format!("from {}", start)),
            Style::default().fg(DEFAULT_THEME.success),
        ),
        field("last op", last_op, Style::default().fg(DEFAULT_THEME.operation)),
        field("steps", interpreter.steps().to_string(), plain),
        field("state", state, state_style),
        Line::from(""),
    ];

    let diagnostics = interpreter.diagnostics();
    if diagnostics.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no diagnostics)",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Diagnostics ({})", diagnostics.len()),
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD),
        )));
        for diagnostic in diagnostics {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>5} ", diagnostic.step),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    diagnostic.to_string(),
                    Style::default().fg(DEFAULT_THEME.error),
                ),
            ]));
        }
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
