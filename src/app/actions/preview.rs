//! Preview actions (content fetch, render preference)

use std::sync::Arc;

use crate::app::events::{AppEvent, task};
use crate::app::state::PreviewMode;
use crate::cache::InFlight;

use super::super::App;

impl App {
    /// Load whatever the preview pane needs for the new selection
    pub(crate) fn on_selection_changed(&mut self) {
        let Some(id) = self.selected_item_id() else {
            return;
        };
        self.request_preview(&id);
        if self.preview_mode == PreviewMode::Summary {
            self.request_summary(&id);
        }
    }

    pub(super) fn open_selected(&mut self) {
        self.preview_mode = PreviewMode::Content;
        if let Some(id) = self.selected_item_id() {
            self.request_preview(&id);
        }
    }

    /// Fetch content (and fresh metadata) once; cached content is reused
    pub(crate) fn request_preview(&mut self, id: &str) {
        if self.cache.content(id).is_some() || !self.cache.begin(InFlight::Content, id) {
            return;
        }
        tracing::debug!("Fetching content for {}", id);

        let mailbox = Arc::clone(&self.collab.mailbox);
        let id = id.to_string();
        self.dispatcher.spawn(task::CONTENT, async move {
            let (content, metadata) = futures::join!(
                mailbox.get_content(id.clone()),
                mailbox.get_metadata(id.clone())
            );
            match content {
                Ok(content) => AppEvent::ContentLoaded {
                    id,
                    content,
                    item: metadata.ok(),
                },
                Err(error) => AppEvent::ContentFailed { id, error },
            }
        });
    }

    pub(super) fn toggle_preference(&mut self) {
        let Some(id) = self.selected_item_id() else {
            return;
        };
        let preference = self.cache.toggle_preference(&id);
        self.status
            .set_message(format!("Showing {} view", preference.label()));
    }
}
