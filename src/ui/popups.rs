//! Overlays: help popup and the prompt bar.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use super::theme::Theme;
use crate::app::state::PromptKind;
use crate::input::KeybindingEntry;

/// Columns reserved for the key name
const KEY_WIDTH: usize = 12;

/// Centered rect clamped to the available area
fn centered_rect(area: Rect, max_width: u16, max_height: u16) -> Rect {
    let w = max_width.min(area.width.saturating_sub(4)).max(10);
    let h = max_height.min(area.height.saturating_sub(4)).max(3);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w.min(area.width), h.min(area.height))
}

pub fn render_help_popup(frame: &mut Frame, area: Rect, keys: &[KeybindingEntry], scroll: usize) {
    let mut categories: Vec<&str> = Vec::new();
    for key in keys {
        if categories.last() != Some(&key.category) {
            categories.push(key.category);
        }
    }
    let content_height = keys.len() + categories.len() * 2;
    let popup_area = centered_rect(area, 54, content_height as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .title_bottom(" j/k scroll │ ? or Esc close ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut items: Vec<ListItem> = Vec::new();
    let mut current_category: Option<&str> = None;
    for entry in keys {
        if current_category != Some(entry.category) {
            if current_category.is_some() {
                items.push(ListItem::new(Line::from("")));
            }
            let rule = "─".repeat(inner.width.saturating_sub(entry.category.len() as u16 + 4) as usize);
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("── {} ", entry.category), Theme::help_category()),
                Span::styled(rule, Theme::border()),
            ])));
            current_category = Some(entry.category);
        }

        let key: String = entry.key.chars().take(KEY_WIDTH).collect();
        items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:width$}", key, width = KEY_WIDTH), Theme::help_key()),
            Span::styled(entry.description.clone(), Theme::help_desc()),
        ])));
    }

    let max_scroll = items.len().saturating_sub(inner.height as usize);
    let visible: Vec<ListItem> = items.into_iter().skip(scroll.min(max_scroll)).collect();
    frame.render_widget(List::new(visible), inner);
}

/// Single-line input prompt shown in place of the help bar
pub fn render_prompt(frame: &mut Frame, area: Rect, kind: PromptKind, buffer: &str) {
    let line = Line::from(vec![
        Span::styled(format!(" {}: ", kind.title()), Theme::help_desc()),
        Span::styled(buffer.to_string(), Theme::input()),
        Span::styled("│", Theme::input()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
