//! Page results

use crate::app::search::SearchMode;
use crate::error::MailError;
use crate::mail::{Cursor, Item};

use super::super::App;

impl App {
    pub(super) fn on_page_items(&mut self, generation: u64, items: Vec<Item>) {
        if !self.search.apply_items(generation, items, &mut self.store) {
            return;
        }
        self.clamp_selection();
        if self.search.mode() == SearchMode::Remote {
            self.status
                .set_message(format!("Searching… {} loaded", self.store.len()));
        }
    }

    pub(super) fn on_page_finished(&mut self, generation: u64, next_cursor: Cursor) {
        let Some(done) = self
            .search
            .finish_page(generation, next_cursor, &mut self.store)
        else {
            return;
        };
        let mode = self.search.mode();

        if done.first {
            let first = (!self.store.is_empty()).then_some(0);
            let selected = match mode {
                SearchMode::Remote => first,
                SearchMode::None | SearchMode::Local => {
                    self.selected.filter(|&pos| pos < self.store.len()).or(first)
                }
            };
            self.reselect(selected);
        } else if self.selected.is_none() && !self.store.is_empty() {
            self.reselect(Some(0));
        }

        let more = if done.exhausted { "" } else { "; more available" };
        match mode {
            SearchMode::Remote => {
                tracing::info!(
                    "Search {:?}: {} results loaded",
                    self.search.query(),
                    self.store.len()
                );
                self.status.set_message(format!(
                    "{} results for \"{}\"{}",
                    self.store.len(),
                    self.search.query(),
                    more
                ));
            }
            SearchMode::None => {
                tracing::info!("Listing: {} messages loaded", self.store.len());
                self.status
                    .set_message(format!("{} messages{}", self.store.len(), more));
            }
            // Pages for the parked listing do not change what is shown
            SearchMode::Local => {}
        }
    }

    pub(super) fn on_page_failed(&mut self, generation: u64, error: MailError) {
        if !self.fail_page(generation) {
            tracing::debug!("Ignoring failure of stale listing {}", generation);
            return;
        }
        tracing::warn!("Page load failed: {}", error);
        self.status.set_error(format!("Loading failed: {}", error));
    }

    /// Halt the listing `generation`. False when it is stale.
    pub(super) fn fail_page(&mut self, generation: u64) -> bool {
        if !self.search.fail_page(generation, &mut self.store) {
            return false;
        }
        self.clamp_selection();
        true
    }

    /// A reload may have shrunk the list under the selection
    fn clamp_selection(&mut self) {
        if self.selected.is_some_and(|pos| pos >= self.store.len()) {
            let last = self.store.len().checked_sub(1);
            self.reselect(last);
        }
    }
}
