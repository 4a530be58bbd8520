//! Action handlers for user input
//!
//! This module is split into focused submodules:
//! - `navigation`: Selection movement and help scrolling
//! - `listing`: Reload, remote search, local filter and pagination
//! - `mail`: Single-item operations on the selected message
//! - `bulk`: Multi-item selection and bulk operations
//! - `preview`: Content fetching and render preference
//! - `ai`: AI-powered features (summaries, label suggestions)
//! - `input`: Prompt text input

mod ai;
mod bulk;
mod input;
mod listing;
mod mail;
mod navigation;
mod preview;

use crate::error::MailError;
use crate::input::Action;

use super::App;
use super::search::SearchMode;
use super::state::{InputMode, PreviewMode, PromptKind};

/// Rows moved by PageUp/PageDown
const PAGE_JUMP: isize = 10;

impl App {
    pub(crate) fn handle_action(&mut self, action: Action) {
        self.dirty = true;

        if self.input.is_help() {
            match action {
                Action::Up => self.help_scroll(-1),
                Action::Down => self.help_scroll(1),
                Action::Help | Action::Back => self.input = InputMode::Normal,
                _ => {}
            }
            return;
        }
        if self.input.is_prompt() {
            // Only Back reaches here while typing
            if action == Action::Back {
                self.input = InputMode::Normal;
            }
            return;
        }

        match action {
            // Navigation
            Action::Up => self.move_by(-1),
            Action::Down => self.move_by(1),
            Action::PageUp => self.move_by(-PAGE_JUMP),
            Action::PageDown => self.move_by(PAGE_JUMP),
            Action::Top => self.move_to_top(),
            Action::Bottom => self.move_to_bottom(),

            Action::Open => self.open_selected(),
            Action::Back => self.go_back(),
            Action::Quit => {} // Handled in event loop

            // Listing
            Action::Refresh => self.reload(),
            Action::LoadMore => self.load_more(true),
            Action::Search => self.open_prompt(PromptKind::RemoteSearch),
            Action::Filter => self.open_prompt(PromptKind::LocalFilter),

            // Mail operations; routed to the bulk path while a selection exists
            Action::Archive => self.archive_selected(),
            Action::Trash => self.trash_selected(),
            Action::ToggleRead => self.toggle_read(),
            Action::ToggleStar => self.toggle_star(),
            Action::Label => self.open_prompt(PromptKind::Label),
            Action::Forward => self.open_prompt(PromptKind::Forward),

            // Selection
            Action::ToggleSelect => self.toggle_select(),
            Action::SelectAll => self.select_all(),

            // Preview
            Action::TogglePreference => self.toggle_preference(),
            Action::ToggleSummary => self.toggle_summary(),
            Action::SuggestLabels => self.suggest_labels(),

            Action::Help => self.input = InputMode::Help { scroll: 0 },
        }
    }

    /// Esc unwinds one layer of state at a time
    pub(super) fn go_back(&mut self) {
        if self.bulk.cancel() {
            self.status.set_message("Selection cleared");
            return;
        }
        if self.preview_mode == PreviewMode::Summary {
            self.preview_mode = PreviewMode::Content;
            return;
        }
        if self.exit_local() {
            return;
        }
        if self.search.mode() == SearchMode::Remote {
            self.reload();
            self.status.set_message("Search cleared");
            return;
        }
        self.status.acknowledge_error();
    }

    /// Surface a rejected or failed action on the status line
    pub(crate) fn report(&mut self, error: MailError) {
        tracing::debug!("Action rejected: {}", error);
        self.status.set_error(error);
    }
}
