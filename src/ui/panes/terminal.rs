//! Program output pane rendering

use super::{border_style, clamp_scroll};
use crate::snapshot::MockTerminal;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the captured `print` output
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    terminal: &MockTerminal,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Output ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines = terminal.get_output();

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = lines
        .iter()
        .map(|line| {
            // Error lines from `print` share the stream with regular output
            let color = if line.starts_with("ERR ") {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            };
            ListItem::new(line.as_str()).style(Style::default().fg(color))
        })
        .collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    clamp_scroll(scroll_offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
