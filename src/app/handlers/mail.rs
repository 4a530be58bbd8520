//! Content, mutation, forwarding and bulk results

use crate::app::bulk::{BulkAction, BulkOutcome};
use crate::app::state::PreviewMode;
use crate::cache::InFlight;
use crate::error::MailError;
use crate::mail::{Content, Item, Mutation};

use super::super::App;

impl App {
    pub(super) fn on_content_loaded(&mut self, id: String, content: Content, item: Option<Item>) {
        self.cache.finish(InFlight::Content, &id);
        self.cache.store_content(&id, content);
        if let Some(item) = item {
            self.search.refresh(&item);
            self.store.refresh(item);
        }

        // Generations that were waiting on this content
        let pending: Vec<_> = self
            .pending_generation
            .iter()
            .filter(|(_, pending)| *pending == id)
            .cloned()
            .collect();
        for (kind, pending_id) in pending {
            self.pending_generation.remove(&(kind, pending_id.clone()));
            self.request_generation(kind, &pending_id);
        }

        if self.selected_item_id().as_deref() != Some(id.as_str()) {
            return;
        }
        if self.store.item(&id).is_some_and(Item::is_unread) {
            self.mutate(id.clone(), Mutation::MarkRead);
        }
        if self.preview_mode == PreviewMode::Summary {
            self.request_summary(&id);
        }
    }

    pub(super) fn on_content_failed(&mut self, id: String, error: MailError) {
        self.cache.finish(InFlight::Content, &id);
        self.pending_generation.retain(|(_, pending)| *pending != id);
        if error.is_not_found() {
            tracing::info!("{} no longer exists, removing", id);
            self.remove_item(&id);
            self.status.set_error(error);
            return;
        }
        tracing::warn!("Content fetch failed for {}: {}", id, error);
        if self.selected_item_id().as_deref() == Some(id.as_str()) {
            self.status.set_error(error);
        }
    }

    pub(super) fn on_mutation_applied(&mut self, id: String, mutation: Mutation) {
        tracing::info!("{} {}", mutation.done_verb(), id);
        if mutation.is_destructive() {
            self.remove_item(&id);
        } else {
            self.store.apply_mutation(&id, &mutation);
            self.search.apply_mutation(&id, &mutation);
        }
        self.status.set_message(mutation.done_verb());
    }

    pub(super) fn on_mutation_failed(&mut self, id: String, mutation: Mutation, error: MailError) {
        tracing::warn!("{} {} failed: {}", mutation.progress_verb(), id, error);
        if error.is_not_found() {
            self.remove_item(&id);
        }
        self.status.set_error(error);
    }

    pub(super) fn on_forward_failed(&mut self, id: String, error: MailError) {
        tracing::warn!("Forwarding {} failed: {}", id, error);
        if error.is_not_found() {
            self.remove_item(&id);
        }
        self.status.set_error(error);
    }

    pub(super) fn on_bulk_finished(&mut self, outcome: BulkOutcome) {
        self.bulk_progress = None;

        // The parked listing (local filter) needs the same flag changes
        if let BulkAction::Mutate(mutation) = &outcome.action
            && !mutation.is_destructive()
        {
            for id in &outcome.succeeded {
                self.search.apply_mutation(id, mutation);
            }
        }

        let report = self
            .bulk
            .reconcile(outcome, &mut self.store, self.selected);
        if !report.removed.is_empty() {
            self.search.forget(&report.removed);
            for id in &report.removed {
                self.cache.invalidate(id);
            }
        }
        self.reselect(report.selected);

        if report.is_warning() {
            tracing::warn!("{}", report.message);
            self.status.set_warning(report.message);
        } else {
            tracing::info!("{}", report.message);
            self.status.set_message(report.message);
        }
    }
}
