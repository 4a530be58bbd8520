//! Preview pane for the selected message

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::status_bar::spinner_char;
use super::theme::Theme;
use super::widgets::sanitize_text;
use crate::app::state::PreviewView;

pub fn render_preview(frame: &mut Frame, area: Rect, preview: Option<&PreviewView>) {
    let Some(preview) = preview else {
        let paragraph = Paragraph::new("No message selected")
            .style(Theme::text_muted())
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Note
            Constraint::Length(1), // Gap
            Constraint::Min(0),    // Body
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", sanitize_text(&preview.title)),
        Theme::title(),
    )));
    frame.render_widget(title, chunks[0]);

    if let Some(note) = &preview.note {
        let note = Paragraph::new(Line::from(Span::styled(
            format!(" {}", note),
            Theme::text_muted(),
        )));
        frame.render_widget(note, chunks[1]);
    }

    let body = match &preview.body {
        Some(body) => Paragraph::new(sanitize_text(body))
            .style(Theme::text())
            .wrap(Wrap { trim: false }),
        None if preview.loading => {
            Paragraph::new(format!(" {} Loading...", spinner_char())).style(Theme::text_muted())
        }
        None => Paragraph::new(" Not loaded. Press Enter to retry.").style(Theme::text_muted()),
    };
    frame.render_widget(body, chunks[3]);
}
