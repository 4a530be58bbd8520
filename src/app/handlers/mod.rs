//! Event handlers for the application
//!
//! Background results arrive as [`AppEvent`]s and are applied here, one at a
//! time, by the owner loop:
//! - `listing`: page chunks, completion and failure
//! - `mail`: content, single-item mutations, forwarding and bulk outcomes
//! - `ai`: generated summaries and label suggestions

mod ai;
mod listing;
mod mail;

use super::App;
use super::events::{AppEvent, task};
use crate::cache::InFlight;

impl App {
    pub(crate) fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageItems { generation, items } => self.on_page_items(generation, items),
            AppEvent::PageFinished {
                generation,
                next_cursor,
            } => self.on_page_finished(generation, next_cursor),
            AppEvent::PageFailed { generation, error } => self.on_page_failed(generation, error),

            AppEvent::ContentLoaded { id, content, item } => {
                self.on_content_loaded(id, content, item)
            }
            AppEvent::ContentFailed { id, error } => self.on_content_failed(id, error),

            AppEvent::MutationApplied { id, mutation } => self.on_mutation_applied(id, mutation),
            AppEvent::MutationFailed {
                id,
                mutation,
                error,
            } => self.on_mutation_failed(id, mutation, error),

            AppEvent::Forwarded { id } => {
                tracing::info!("Forwarded {}", id);
                self.status.set_message("Forwarded");
            }
            AppEvent::ForwardFailed { id, error } => self.on_forward_failed(id, error),

            AppEvent::SummaryReady { id, text } => self.on_summary_ready(id, text),
            AppEvent::LabelsReady { id, labels } => self.on_labels_ready(id, labels),
            AppEvent::GenerationFailed { kind, id, error } => {
                self.on_generation_failed(kind, id, error)
            }

            AppEvent::BulkProgress { done, total } => self.bulk_progress = Some((done, total)),
            AppEvent::BulkFinished(outcome) => self.on_bulk_finished(outcome),

            AppEvent::TaskFailed {
                task,
                generation,
                error,
            } => self.on_task_failed(task, generation, error),
        }
    }

    /// A task panicked: release whatever it was holding so the user can retry
    fn on_task_failed(&mut self, task: &'static str, generation: Option<u64>, error: String) {
        match task {
            task::PAGE => {
                let generation = generation.unwrap_or_else(|| self.search.generation());
                if !self.fail_page(generation) {
                    tracing::debug!("Ignoring panic of stale listing {}", generation);
                    return;
                }
            }
            task::BULK => {
                self.bulk.abort();
                self.bulk_progress = None;
            }
            task::CONTENT => {
                self.cache.clear_in_flight(InFlight::Content);
                self.pending_generation.clear();
            }
            task::SUMMARY => self.cache.clear_in_flight(InFlight::Summary),
            task::LABELS => self.cache.clear_in_flight(InFlight::Labels),
            _ => {}
        }
        self.status
            .set_error(format!("Background {} task failed: {}", task, error));
    }
}
