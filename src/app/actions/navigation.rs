//! Navigation actions (selection movement, help scrolling)

use crate::app::state::InputMode;

use super::super::App;

impl App {
    pub(super) fn move_by(&mut self, delta: isize) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() - 1;
        let next = match self.selected {
            Some(pos) => pos.saturating_add_signed(delta).min(last),
            None => 0,
        };
        self.select(Some(next));
    }

    pub(super) fn move_to_top(&mut self) {
        if !self.store.is_empty() {
            self.select(Some(0));
        }
    }

    pub(super) fn move_to_bottom(&mut self) {
        if !self.store.is_empty() {
            self.select(Some(self.store.len() - 1));
        }
    }

    /// Change the selection and load whatever the preview needs
    pub(crate) fn select(&mut self, selected: Option<usize>) {
        let selected = selected.filter(|&pos| pos < self.store.len());
        if selected == self.selected {
            return;
        }
        self.selected = selected;
        self.dirty = true;
        self.on_selection_changed();
    }

    /// Set the selection after the list changed underneath it
    pub(crate) fn reselect(&mut self, selected: Option<usize>) {
        self.selected = selected.filter(|&pos| pos < self.store.len());
        self.dirty = true;
        self.on_selection_changed();
    }

    pub(super) fn help_scroll(&mut self, delta: isize) {
        if let InputMode::Help { scroll } = &mut self.input {
            let max = self.bindings.all_bindings().len().saturating_sub(1);
            *scroll = scroll.saturating_add_signed(delta).min(max);
        }
    }
}
