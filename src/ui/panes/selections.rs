//! Selection stack pane rendering

use super::{border_style, clamp_scroll};
use crate::selection::SelectionStack;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the selection stack, top of stack first
pub fn render_selections_pane(
    frame: &mut Frame,
    area: Rect,
    selections: &SelectionStack,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Selections ({}) ", selections.depth()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let mut items: Vec<ListItem> = Vec::new();

    if let Some(start) = selections.open_start() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                "open ",
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("from {}", start),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ])));
    }

    for (depth, selection) in selections.iter().enumerate() {
        let marker_style = if depth == 0 {
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("#{:<3}", depth), marker_style),
            Span::styled(
                format!("{:<24}", selection.to_string()),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
            Span::styled(
                selection.shape().to_string(),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
        ])));
    }

    if items.is_empty() {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, items.len(), visible_height);

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
