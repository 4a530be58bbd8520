//! Prompt handling (open, text input, submit)

use crate::app::state::{InputMode, PromptKind};
use crate::error::MailError;

use super::super::App;

impl App {
    pub(super) fn open_prompt(&mut self, kind: PromptKind) {
        let needs_target = matches!(kind, PromptKind::Label | PromptKind::Forward);
        if needs_target && self.bulk.is_empty() && self.selected.is_none() {
            self.report(MailError::invalid("no message selected"));
            return;
        }
        if kind == PromptKind::Forward && self.collab.forwarder.is_none() {
            self.report(MailError::unavailable("Forwarding"));
            return;
        }

        // Search and filter prompts start from the active text
        let buffer = match kind {
            PromptKind::RemoteSearch => self.search.query().to_string(),
            PromptKind::LocalFilter => self.search.filter().to_string(),
            PromptKind::Label | PromptKind::Forward => String::new(),
        };
        self.input = InputMode::Prompt { kind, buffer };
    }

    pub(crate) fn handle_char(&mut self, c: char) {
        if let InputMode::Prompt { buffer, .. } = &mut self.input {
            buffer.push(c);
            self.dirty = true;
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        if let InputMode::Prompt { buffer, .. } = &mut self.input {
            buffer.pop();
            self.dirty = true;
        }
    }

    pub(crate) fn submit_prompt(&mut self) {
        if !self.input.is_prompt() {
            return;
        }
        let InputMode::Prompt { kind, buffer } = std::mem::take(&mut self.input) else {
            return;
        };
        self.dirty = true;

        match kind {
            PromptKind::RemoteSearch => self.start_remote_search(&buffer),
            PromptKind::LocalFilter => self.apply_local_filter(&buffer),
            PromptKind::Label => self.apply_label(&buffer),
            PromptKind::Forward => self.forward(&buffer),
        }
    }
}
