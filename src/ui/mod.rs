//! Terminal rendering.
//!
//! Everything here draws from an owned [`ViewState`] snapshot and never
//! touches app state.
//! - `list` - Message list with virtual scrolling
//! - `preview` - Preview pane for the selected message
//! - `status_bar` - Top status line
//! - `popups` - Help popup and prompt bar
//! - `widgets` - Shared helpers (help bar, error bar, text width)

mod list;
mod popups;
mod preview;
mod status_bar;
mod theme;
mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::state::{InputMode, ViewState};
use crate::constants::MIN_SPLIT_VIEW_WIDTH;

use list::render_list;
use popups::{render_help_popup, render_prompt};
use preview::render_preview;
use status_bar::status_bar;
use widgets::{error_bar, help_bar};

pub fn render(frame: &mut Frame, state: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Main content (split view)
            Constraint::Length(1), // Prompt, error or help bar
        ])
        .split(frame.area());
    let (status_area, main_area, bottom_area) = (chunks[0], chunks[1], chunks[2]);

    status_bar(frame, status_area, state);

    // Split view: list on left, preview on right (if wide enough)
    if main_area.width >= MIN_SPLIT_VIEW_WIDTH {
        let ratio = state.split_ratio;
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(ratio),
                Constraint::Percentage(100 - ratio),
            ])
            .split(main_area);
        render_list(frame, split[0], state, true);
        render_preview(frame, split[1], state.preview.as_ref());
    } else {
        // Narrow terminal: only show the list (no border)
        render_list(frame, main_area, state, false);
    }

    match &state.input {
        InputMode::Prompt { kind, buffer } => render_prompt(frame, bottom_area, *kind, buffer),
        _ if state.status.error.is_some() => {
            let error = state.status.error.as_deref().unwrap_or_default();
            error_bar(frame, bottom_area, error);
        }
        _ if state.marked > 0 => {
            let hints = &[
                ("e", "archive"),
                ("d", "trash"),
                ("m", "read"),
                ("s", "star"),
                ("l", "label"),
                ("Esc", "clear"),
            ];
            help_bar(frame, bottom_area, hints);
        }
        _ => {
            let hints = &[
                ("j/k", "nav"),
                ("/", "search"),
                ("f", "filter"),
                ("x", "select"),
                ("?", "help"),
            ];
            help_bar(frame, bottom_area, hints);
        }
    }

    // Help overlay (rendered last so it appears on top)
    if let InputMode::Help { scroll } = state.input {
        render_help_popup(frame, frame.area(), &state.help, scroll);
    }
}
