//! Status bar rendering with loading indicator, listing info and messages

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::{Theme, symbols};
use super::widgets::{display_width, truncate_to_width};
use crate::app::state::{StatusLevel, ViewState};
use crate::constants::SPINNER_FRAME_MS;

pub fn status_bar(frame: &mut Frame, area: Rect, state: &ViewState) {
    let style = Theme::status_bar();
    let width = area.width as usize;

    let (indicator, indicator_style) = if state.loading {
        (format!(" {} ", spinner_char()), Theme::status_busy())
    } else {
        (format!(" {} ", symbols::IDLE), Theme::status_idle())
    };

    // Left: listing info
    let mut info = match &state.mode_label {
        Some(label) => format!("[{}] ", label),
        None => String::new(),
    };
    info.push_str(&format!(
        "{}{} messages",
        state.rows.len(),
        if state.more_available { "+" } else { "" }
    ));
    if state.marked > 0 {
        info.push_str(&format!(" │ {} selected", state.marked));
    }
    // Unacknowledged error indicator
    let error_indicator = if state.status.has_unacknowledged_error {
        " !"
    } else {
        ""
    };

    // Right: latest status message
    let message_style = match state.status.level {
        StatusLevel::Info => Theme::status_muted(),
        StatusLevel::Warning => Theme::status_warning(),
    };
    let left_width = display_width(&indicator) + display_width(&info) + error_indicator.len();
    let available = width.saturating_sub(left_width + 2);
    let message = truncate_to_width(&state.status.message, available);
    let padding = width.saturating_sub(left_width + display_width(&message) + 1);

    let line = Line::from(vec![
        Span::styled(indicator, indicator_style),
        Span::styled(info, style),
        Span::styled(error_indicator, Theme::status_warning()),
        Span::styled(" ".repeat(padding), style),
        Span::styled(message, message_style),
        Span::styled(" ", style),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}

/// Get an animated spinner character for loading states
pub fn spinner_char() -> char {
    const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    SPINNER[(millis / SPINNER_FRAME_MS) as usize % SPINNER.len()]
}
