//! Listing actions (reload, remote search, local filter, pagination)

use std::sync::Arc;

use crate::app::events::{AppEvent, task};
use crate::app::search::{LoadMore, PageRequest};
use crate::constants::STREAM_CHUNK_SIZE;

use super::super::App;

impl App {
    /// Return to the default listing and fetch its first page
    pub(crate) fn reload(&mut self) {
        self.bulk.cancel();
        let request = self.search.reset();
        self.status.set_message("Loading…");
        self.spawn_page(request);
    }

    pub(super) fn start_remote_search(&mut self, query: &str) {
        match self.search.begin_remote(query, &mut self.store) {
            Ok(request) => {
                self.bulk.cancel();
                self.selected = None;
                self.status
                    .set_message(format!("Searching for \"{}\"…", self.search.query()));
                self.spawn_page(request);
            }
            Err(e) => self.report(e),
        }
    }

    /// Fetch the next page. `manual` requests explain why nothing happens.
    pub(crate) fn load_more(&mut self, manual: bool) {
        match self.search.load_more() {
            LoadMore::Request(request) => self.spawn_page(request),
            LoadMore::NoMore if manual => self.status.set_message("No more messages"),
            LoadMore::Busy if manual => self.status.set_message("Already loading…"),
            LoadMore::NoMore | LoadMore::Busy => {}
        }
    }

    /// Load the next page once the selection gets close to the end
    pub(crate) fn maybe_load_more(&mut self) {
        if !self.search.wants_more() {
            return;
        }
        let position = self.selected.unwrap_or(0);
        if position + self.config.list.load_more_threshold >= self.store.len() {
            tracing::debug!("Selection near end of list, loading more");
            self.load_more(false);
        }
    }

    /// Fetch one page in the background, streaming it back in chunks
    fn spawn_page(&mut self, request: PageRequest) {
        let mailbox = Arc::clone(&self.collab.mailbox);
        let page_size = self.config.list.page_size;

        let PageRequest {
            generation,
            query,
            cursor,
        } = request;

        self.dispatcher
            .spawn_listing(task::PAGE, generation, move |dispatcher| async move {
                let result = match query {
                    Some(query) => mailbox.search_page(query, page_size, cursor).await,
                    None => mailbox.list_page(page_size, cursor).await,
                };

                match result {
                    Ok(page) => {
                        for chunk in page.items.chunks(STREAM_CHUNK_SIZE) {
                            dispatcher.post(AppEvent::PageItems {
                                generation,
                                items: chunk.to_vec(),
                            });
                        }
                        dispatcher.post(AppEvent::PageFinished {
                            generation,
                            next_cursor: page.next_cursor,
                        });
                    }
                    Err(error) => dispatcher.post(AppEvent::PageFailed { generation, error }),
                }
            });
    }

    pub(super) fn apply_local_filter(&mut self, filter: &str) {
        match self
            .search
            .enter_local(filter, &mut self.store, self.selected)
        {
            Ok(result) => {
                self.status.set_message(result.status());
                let first = (!self.store.is_empty()).then_some(0);
                self.reselect(first);
            }
            Err(e) => self.report(e),
        }
    }

    /// Leave the local filter. Returns false when none was active.
    pub(super) fn exit_local(&mut self) -> bool {
        let Some(selected) = self.search.exit_local(&mut self.store) else {
            return false;
        };
        self.status.set_message("Filter cleared");
        self.reselect(selected);
        true
    }
}
