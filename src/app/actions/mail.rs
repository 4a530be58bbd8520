//! Single-item operations (archive, trash, flags, label, forward)
//!
//! Nothing changes locally until the remote call succeeds; the result event
//! applies the change.

use std::collections::HashSet;
use std::sync::Arc;

use crate::app::bulk::BulkRequest;
use crate::app::events::{AppEvent, task};
use crate::error::MailError;
use crate::mail::{ForwardOptions, Item, Mutation};

use super::super::App;

impl App {
    pub(super) fn archive_selected(&mut self) {
        if self.bulk.is_active() {
            self.start_bulk(BulkRequest::Archive);
        } else {
            self.mutate_selected(Mutation::Archive);
        }
    }

    pub(super) fn trash_selected(&mut self) {
        if self.bulk.is_active() {
            self.start_bulk(BulkRequest::Trash);
        } else {
            self.mutate_selected(Mutation::Trash);
        }
    }

    pub(super) fn toggle_read(&mut self) {
        if self.bulk.is_active() {
            self.start_bulk(BulkRequest::ToggleRead);
            return;
        }
        let unread = self.selected_item().map(Item::is_unread);
        match unread {
            Some(true) => self.mutate_selected(Mutation::MarkRead),
            Some(false) => self.mutate_selected(Mutation::MarkUnread),
            None => self.report(MailError::invalid("no message selected")),
        }
    }

    pub(super) fn toggle_star(&mut self) {
        if self.bulk.is_active() {
            let all_starred = self
                .store
                .items()
                .iter()
                .filter(|item| self.bulk.is_selected(&item.id))
                .all(Item::is_starred);
            let request = if all_starred {
                BulkRequest::Unstar
            } else {
                BulkRequest::Star
            };
            self.start_bulk(request);
            return;
        }
        let starred = self.selected_item().map(Item::is_starred);
        match starred {
            Some(true) => self.mutate_selected(Mutation::Unstar),
            Some(false) => self.mutate_selected(Mutation::Star),
            None => self.report(MailError::invalid("no message selected")),
        }
    }

    pub(super) fn apply_label(&mut self, label: &str) {
        let label = label.trim();
        if self.bulk.is_active() {
            self.start_bulk(BulkRequest::Label(label.to_string()));
            return;
        }
        if label.is_empty() {
            self.report(MailError::invalid("label is empty"));
            return;
        }
        self.mutate_selected(Mutation::Label(label.to_string()));
    }

    pub(super) fn forward(&mut self, to: &str) {
        let options = ForwardOptions {
            to: to.trim().to_string(),
            note: None,
        };
        if self.bulk.is_active() {
            self.start_bulk(BulkRequest::Forward(options));
            return;
        }

        let Some(forwarder) = self.collab.forwarder.clone() else {
            self.report(MailError::unavailable("Forwarding"));
            return;
        };
        if options.to.is_empty() {
            self.report(MailError::invalid("forward destination is empty"));
            return;
        }
        let Some(id) = self.selected_item_id() else {
            self.report(MailError::invalid("no message selected"));
            return;
        };

        self.status.set_message(format!("Forwarding to {}…", options.to));
        self.dispatcher.spawn(task::FORWARD, async move {
            match forwarder.forward(id.clone(), options).await {
                Ok(()) => AppEvent::Forwarded { id },
                Err(error) => AppEvent::ForwardFailed { id, error },
            }
        });
    }

    fn mutate_selected(&mut self, mutation: Mutation) {
        let Some(id) = self.selected_item_id() else {
            self.report(MailError::invalid("no message selected"));
            return;
        };
        self.status
            .set_message(format!("{}…", mutation.progress_verb()));
        self.mutate(id, mutation);
    }

    /// Issue a remote mutation; the list changes when it succeeds
    pub(crate) fn mutate(&mut self, id: String, mutation: Mutation) {
        tracing::debug!("{} {}", mutation.progress_verb(), id);
        let mailbox = Arc::clone(&self.collab.mailbox);
        self.dispatcher.spawn(task::MUTATION, async move {
            let result = mutation.apply(mailbox.as_ref(), id.clone()).await;
            match result {
                Ok(()) => AppEvent::MutationApplied { id, mutation },
                Err(error) => AppEvent::MutationFailed {
                    id,
                    mutation,
                    error,
                },
            }
        });
    }

    /// Drop an item that is gone remotely from every view and cache
    pub(crate) fn remove_item(&mut self, id: &str) {
        let removed = HashSet::from([id.to_string()]);
        if let Some(position) = self.store.position_of(id) {
            let next = self.store.remove_at(position);
            let selected = match self.selected {
                Some(sel) if sel == position => next,
                Some(sel) if sel > position => Some(sel - 1),
                other => other,
            };
            self.reselect(selected);
        }
        self.search.forget(&removed);
        self.bulk.forget(&removed);
        self.cache.invalidate(id);
        self.pending_generation.retain(|(_, pending)| pending != id);
    }

    pub(crate) fn selected_item(&self) -> Option<&Item> {
        self.selected.and_then(|pos| self.store.get(pos))
    }
}
