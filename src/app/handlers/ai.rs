//! Generation results

use crate::ai::GenerationKind;
use crate::cache::InFlight;
use crate::error::MailError;

use super::super::App;

impl App {
    pub(super) fn on_summary_ready(&mut self, id: String, text: String) {
        self.cache.finish(InFlight::Summary, &id);
        self.cache.store_summary(&id, text);
        if self.selected_item_id().as_deref() == Some(id.as_str()) {
            self.status.set_message("Summary ready");
        }
    }

    pub(super) fn on_labels_ready(&mut self, id: String, labels: Vec<String>) {
        self.cache.finish(InFlight::Labels, &id);
        if self.selected_item_id().as_deref() == Some(id.as_str()) {
            self.show_label_suggestions(&labels);
        }
        self.cache.store_labels(&id, labels);
    }

    pub(super) fn on_generation_failed(&mut self, kind: GenerationKind, id: String, error: MailError) {
        self.cache.finish(kind.into(), &id);
        tracing::warn!("{} failed for {}: {}", kind.label(), id, error);
        self.status
            .set_error(format!("{} failed: {}", kind.label(), error));
    }
}
