//! Multi-item selection and bulk operations

use std::sync::Arc;

use crate::app::bulk::BulkRequest;
use crate::app::events::{AppEvent, task};

use super::super::App;

impl App {
    pub(super) fn toggle_select(&mut self) {
        let Some(id) = self.selected_item_id() else {
            return;
        };
        self.bulk.toggle(&id);
        self.report_selection();
    }

    pub(super) fn select_all(&mut self) {
        self.bulk.select_all(&self.store);
        self.report_selection();
    }

    fn report_selection(&mut self) {
        if self.bulk.is_empty() {
            self.status.set_message("Selection cleared");
        } else {
            self.status
                .set_message(format!("{} selected", self.bulk.len()));
        }
    }

    /// Snapshot the selection and run the operation in one background task
    pub(crate) fn start_bulk(&mut self, request: BulkRequest) {
        let has_forwarder = self.collab.forwarder.is_some();
        let plan = match self.bulk.plan(request, &self.store, has_forwarder) {
            Ok(plan) => plan,
            Err(e) => {
                self.report(e);
                return;
            }
        };

        let message = plan.progress_message();
        tracing::info!("{}", message);
        self.status.set_message(message);
        self.bulk_progress = Some((0, plan.ids.len()));

        let mailbox = Arc::clone(&self.collab.mailbox);
        let forwarder = self.collab.forwarder.clone();
        self.dispatcher
            .spawn_with(task::BULK, move |dispatcher| async move {
                let outcome = plan
                    .execute(mailbox.as_ref(), forwarder.as_deref(), |done, total| {
                        dispatcher.post(AppEvent::BulkProgress { done, total });
                    })
                    .await;
                dispatcher.post(AppEvent::BulkFinished(outcome));
            });
    }
}
