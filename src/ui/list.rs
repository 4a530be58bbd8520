//! Message list rendering with virtual scrolling.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::theme::{Theme, symbols, with_selection_bg};
use super::widgets::{display_width, sanitize_text, truncate_to_width};
use crate::app::state::{RowView, ViewState};

/// Keep the selection this fraction down from the top when scrolling
const SCROLL_TARGET_FRACTION: usize = 3;

/// Width reserved for the sender column
const FROM_WIDTH: usize = 20;

pub fn render_list(frame: &mut Frame, area: Rect, state: &ViewState, show_border: bool) {
    let inner = if show_border {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Theme::border());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    } else {
        area
    };

    if state.rows.is_empty() {
        let msg = if state.loading {
            "Loading messages..."
        } else if state.mode_label.is_some() {
            "No matching messages. Press Esc to clear."
        } else {
            "No messages."
        };
        let paragraph = Paragraph::new(msg)
            .style(Theme::text_muted())
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, inner);
        return;
    }

    let visible_lines = inner.height as usize;
    let offset = scroll_offset(state.selected, state.rows.len(), visible_lines);

    // Build items ONLY for visible rows
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_lines)
        .map(|(idx, row)| ListItem::new(row_line(row, state.selected == Some(idx), inner.width)))
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// First visible row so the selection stays on screen
fn scroll_offset(selected: Option<usize>, total: usize, visible: usize) -> usize {
    let Some(selected) = selected else {
        return 0;
    };
    let target = visible / SCROLL_TARGET_FRACTION;
    selected
        .saturating_sub(target)
        .min(total.saturating_sub(visible))
}

/// One row: ◆●★ sender   subject - snippet [labels]   date
fn row_line(row: &RowView, selected: bool, width: u16) -> Line<'static> {
    let width = width as usize;
    let base = with_selection_bg(Theme::text(), selected);

    let mark = if row.marked {
        symbols::MARKED
    } else {
        symbols::UNMARKED
    };
    let unread = if row.unread {
        symbols::UNREAD
    } else {
        symbols::READ
    };
    let flag = if row.starred {
        (symbols::STARRED, Theme::star_indicator())
    } else if row.important {
        (symbols::IMPORTANT, Theme::important_indicator())
    } else {
        (" ", Theme::text_muted())
    };

    let text_style = if row.unread {
        Theme::text_unread()
    } else {
        Theme::text_secondary()
    };

    let from = truncate_to_width(&sanitize_text(&row.from), FROM_WIDTH);
    let from = format!("{}{} ", from, " ".repeat(FROM_WIDTH - display_width(&from)));
    let date = format!(" {}", row.date);
    let labels = if row.labels.is_empty() {
        String::new()
    } else {
        format!(" [{}]", row.labels.join(", "))
    };

    // Indicators take 4 columns
    let fixed = 4 + display_width(&from) + display_width(&date) + display_width(&labels);
    let subject_width = width.saturating_sub(fixed);
    let mut subject = sanitize_text(&row.subject);
    if !row.snippet.is_empty() {
        subject.push_str(" - ");
        subject.push_str(&sanitize_text(&row.snippet));
    }
    let subject = truncate_to_width(&subject.replace('\n', " "), subject_width);
    let padding = subject_width.saturating_sub(display_width(&subject));

    Line::from(vec![
        Span::styled(mark, with_selection_bg(Theme::marked_indicator(), selected)),
        Span::styled(unread, with_selection_bg(Theme::unread_indicator(), selected)),
        Span::styled(flag.0, with_selection_bg(flag.1, selected)),
        Span::styled(" ", base),
        Span::styled(from, with_selection_bg(text_style, selected)),
        Span::styled(subject, with_selection_bg(text_style, selected)),
        Span::styled(labels, with_selection_bg(Theme::label(), selected)),
        Span::styled(" ".repeat(padding), base),
        Span::styled(date, with_selection_bg(Theme::text_muted(), selected)),
    ])
}
