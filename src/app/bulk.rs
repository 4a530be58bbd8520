//! Multi-item selection and bulk operations.
//!
//! A bulk operation snapshots the selection in list order, runs the
//! single-item remote call for every id one after another in one background
//! task, and tallies failures instead of aborting. The owner reconciles the
//! outcome: only ids that succeeded are removed or updated.

use std::collections::HashSet;

use super::store::ListStore;
use crate::error::{MailError, MailResult};
use crate::mail::{ForwardOptions, Forwarder, Mailbox, Mutation};

/// Bulk operation requested by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkRequest {
    Archive,
    Trash,
    /// Mark read or unread, decided by majority
    ToggleRead,
    Star,
    Unstar,
    Label(String),
    Forward(ForwardOptions),
}

/// Concrete per-item action, fixed before the loop starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Mutate(Mutation),
    Forward(ForwardOptions),
}

impl BulkAction {
    fn progress_verb(&self) -> &'static str {
        match self {
            Self::Mutate(m) => m.progress_verb(),
            Self::Forward(_) => "Forwarding",
        }
    }

    fn done_verb(&self) -> &'static str {
        match self {
            Self::Mutate(m) => m.done_verb(),
            Self::Forward(_) => "Forwarded",
        }
    }
}

/// Snapshot of a bulk operation ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkPlan {
    pub action: BulkAction,
    pub ids: Vec<String>,
}

impl BulkPlan {
    pub fn progress_message(&self) -> String {
        format!(
            "{} {} {}…",
            self.action.progress_verb(),
            self.ids.len(),
            plural(self.ids.len())
        )
    }

    /// Run the plan sequentially, reporting progress after each item
    pub async fn execute(
        self,
        mailbox: &dyn Mailbox,
        forwarder: Option<&dyn Forwarder>,
        mut progress: impl FnMut(usize, usize),
    ) -> BulkOutcome {
        let total = self.ids.len();
        let mut succeeded = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (done, id) in self.ids.into_iter().enumerate() {
            let result = match &self.action {
                BulkAction::Mutate(mutation) => mutation.apply(mailbox, id.clone()).await,
                BulkAction::Forward(options) => match forwarder {
                    Some(f) => f.forward(id.clone(), options.clone()).await,
                    None => Err(MailError::unavailable("Forwarding")),
                },
            };
            match result {
                Ok(()) => succeeded.push(id),
                Err(e) => {
                    tracing::warn!(
                        "Bulk {} failed for {}: {}",
                        self.action.progress_verb(),
                        id,
                        e
                    );
                    failures.push((id, e));
                }
            }
            progress(done + 1, total);
        }

        BulkOutcome {
            action: self.action,
            succeeded,
            failures,
        }
    }
}

/// Per-id results of a finished bulk operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub action: BulkAction,
    pub succeeded: Vec<String>,
    pub failures: Vec<(String, MailError)>,
}

/// What the owner did with a bulk outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    /// New list selection
    pub selected: Option<usize>,
    /// Ids removed from the list
    pub removed: HashSet<String>,
    pub failures: usize,
    pub message: String,
}

impl BulkReport {
    pub fn is_warning(&self) -> bool {
        self.failures > 0
    }
}

#[derive(Debug, Default)]
pub struct BulkCoordinator {
    selection: HashSet<String>,
    active: bool,
    running: bool,
}

impl BulkCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Add or remove an id; enters bulk mode
    pub fn toggle(&mut self, id: &str) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
        self.active = !self.selection.is_empty();
    }

    /// Select every item in the list, or clear if all are already selected
    pub fn select_all(&mut self, store: &ListStore) {
        if !store.is_empty() && store.ids().iter().all(|id| self.selection.contains(id)) {
            self.selection.clear();
        } else {
            self.selection.extend(store.ids().iter().cloned());
        }
        self.active = !self.selection.is_empty();
    }

    /// Leave bulk mode. Returns false if there was nothing to cancel.
    pub fn cancel(&mut self) -> bool {
        if !self.active && self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        self.active = false;
        true
    }

    /// Forget a running operation that never reported back. The selection
    /// is kept so the user can retry.
    pub fn abort(&mut self) {
        self.running = false;
    }

    /// Drop ids that left the list by other means
    pub fn forget(&mut self, ids: &HashSet<String>) {
        self.selection.retain(|id| !ids.contains(id));
        self.active = !self.selection.is_empty();
    }

    /// Snapshot the selection into a plan and mark the operation running
    pub fn plan(
        &mut self,
        request: BulkRequest,
        store: &ListStore,
        has_forwarder: bool,
    ) -> MailResult<BulkPlan> {
        if self.running {
            return Err(MailError::invalid("bulk operation already running"));
        }
        let ids: Vec<String> = store
            .ids()
            .iter()
            .filter(|id| self.selection.contains(*id))
            .cloned()
            .collect();
        if ids.is_empty() {
            return Err(MailError::invalid("no messages selected"));
        }

        let action = match request {
            BulkRequest::Archive => BulkAction::Mutate(Mutation::Archive),
            BulkRequest::Trash => BulkAction::Mutate(Mutation::Trash),
            BulkRequest::Star => BulkAction::Mutate(Mutation::Star),
            BulkRequest::Unstar => BulkAction::Mutate(Mutation::Unstar),
            BulkRequest::Label(label) => {
                let label = label.trim().to_string();
                if label.is_empty() {
                    return Err(MailError::invalid("label is empty"));
                }
                BulkAction::Mutate(Mutation::Label(label))
            }
            BulkRequest::ToggleRead => {
                let unread = ids
                    .iter()
                    .filter(|id| store.item(id).is_some_and(|i| i.is_unread()))
                    .count();
                if unread * 2 > ids.len() {
                    BulkAction::Mutate(Mutation::MarkRead)
                } else {
                    BulkAction::Mutate(Mutation::MarkUnread)
                }
            }
            BulkRequest::Forward(options) => {
                if !has_forwarder {
                    return Err(MailError::unavailable("Forwarding"));
                }
                if options.to.trim().is_empty() {
                    return Err(MailError::invalid("forward destination is empty"));
                }
                BulkAction::Forward(options)
            }
        };

        self.running = true;
        Ok(BulkPlan { action, ids })
    }

    /// Apply a finished operation to the list and leave bulk mode
    pub fn reconcile(
        &mut self,
        outcome: BulkOutcome,
        store: &mut ListStore,
        selected: Option<usize>,
    ) -> BulkReport {
        self.running = false;
        self.selection.clear();
        self.active = false;

        let mut removed = HashSet::new();
        let mut next = selected;
        match &outcome.action {
            BulkAction::Mutate(mutation) if mutation.is_destructive() => {
                removed = outcome.succeeded.iter().cloned().collect();
                next = store.remove_ids(&removed, selected);
            }
            BulkAction::Mutate(mutation) => {
                for id in &outcome.succeeded {
                    store.apply_mutation(id, mutation);
                }
            }
            BulkAction::Forward(_) => {}
        }

        let failures = outcome.failures.len();
        let mut message = format!(
            "{} {}",
            outcome.action.done_verb(),
            outcome.succeeded.len()
        );
        if failures > 0 {
            message.push_str(&format!(
                ", {} failure{}",
                failures,
                if failures == 1 { "" } else { "s" }
            ));
        }

        BulkReport {
            selected: next,
            removed,
            failures,
            message,
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "message" } else { "messages" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{Item, ItemFlags};
    use crate::testing::{FakeForwarder, FakeMailbox};

    fn store(unread: &[bool]) -> ListStore {
        let mut store = ListStore::new();
        store.replace(
            unread
                .iter()
                .enumerate()
                .map(|(i, &u)| {
                    let mut item = Item::new(format!("m{}", i), format!("subject {}", i));
                    item.set_flag(ItemFlags::UNREAD, u);
                    item
                })
                .collect(),
        );
        store
    }

    #[test]
    fn test_majority_unread_marks_all_read() {
        let s = store(&[true, true, true, false, false]);
        let mut bulk = BulkCoordinator::new();
        bulk.select_all(&s);
        let plan = bulk.plan(BulkRequest::ToggleRead, &s, false).unwrap();
        assert_eq!(plan.action, BulkAction::Mutate(Mutation::MarkRead));
        assert_eq!(plan.ids.len(), 5);
    }

    #[test]
    fn test_half_unread_marks_all_unread() {
        let s = store(&[true, true, false, false]);
        let mut bulk = BulkCoordinator::new();
        bulk.select_all(&s);
        let plan = bulk.plan(BulkRequest::ToggleRead, &s, false).unwrap();
        assert_eq!(plan.action, BulkAction::Mutate(Mutation::MarkUnread));
    }

    #[test]
    fn test_plan_snapshot_in_list_order() {
        let s = store(&[false, false, false, false]);
        let mut bulk = BulkCoordinator::new();
        bulk.toggle("m3");
        bulk.toggle("m0");
        bulk.toggle("m2");
        bulk.toggle("m2");
        let plan = bulk.plan(BulkRequest::Archive, &s, false).unwrap();
        assert_eq!(plan.ids, vec!["m0", "m3"]);
        assert_eq!(plan.progress_message(), "Archiving 2 messages…");
    }

    #[test]
    fn test_plan_rejections() {
        let s = store(&[false, false]);
        let mut bulk = BulkCoordinator::new();
        let err = bulk.plan(BulkRequest::Archive, &s, false).unwrap_err();
        assert!(matches!(err, MailError::Invalid(_)));

        bulk.toggle("m0");
        let err = bulk
            .plan(
                BulkRequest::Forward(ForwardOptions {
                    to: "team".into(),
                    note: None,
                }),
                &s,
                false,
            )
            .unwrap_err();
        assert!(matches!(err, MailError::Unavailable(_)));

        bulk.plan(BulkRequest::Trash, &s, false).unwrap();
        let err = bulk.plan(BulkRequest::Trash, &s, false).unwrap_err();
        assert_eq!(err, MailError::invalid("bulk operation already running"));
    }

    #[test]
    fn test_select_all_toggles() {
        let s = store(&[false, false]);
        let mut bulk = BulkCoordinator::new();
        bulk.select_all(&s);
        assert_eq!(bulk.len(), 2);
        assert!(bulk.is_active());
        bulk.select_all(&s);
        assert!(bulk.is_empty());
        assert!(!bulk.is_active());
    }

    #[tokio::test]
    async fn test_archive_with_partial_failure() {
        let mut s = store(&[false, false, false]);
        let mailbox = FakeMailbox::with_items(s.items().to_vec());
        mailbox.fail_on("m1");

        let mut bulk = BulkCoordinator::new();
        bulk.select_all(&s);
        let plan = bulk.plan(BulkRequest::Archive, &s, false).unwrap();

        let mut reports = Vec::new();
        let outcome = plan
            .execute(&mailbox, None, |done, total| reports.push((done, total)))
            .await;
        assert_eq!(reports, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(outcome.succeeded, vec!["m0", "m2"]);

        let report = bulk.reconcile(outcome, &mut s, Some(0));
        assert_eq!(s.ids(), ["m1"]);
        assert_eq!(report.failures, 1);
        assert!(report.is_warning());
        assert!(report.message.contains("1 failure"));
        assert_eq!(report.message, "Archived 2, 1 failure");
        assert_eq!(report.selected, Some(0));
        assert!(bulk.is_empty());
        assert!(!bulk.is_running());
    }

    #[tokio::test]
    async fn test_flag_op_updates_only_succeeded() {
        let mut s = store(&[true, true, true]);
        let mailbox = FakeMailbox::with_items(s.items().to_vec());
        mailbox.fail_on("m2");

        let mut bulk = BulkCoordinator::new();
        bulk.select_all(&s);
        let plan = bulk.plan(BulkRequest::ToggleRead, &s, false).unwrap();
        let outcome = plan.execute(&mailbox, None, |_, _| {}).await;
        let report = bulk.reconcile(outcome, &mut s, Some(1));

        assert!(!s.item("m0").unwrap().is_unread());
        assert!(!s.item("m1").unwrap().is_unread());
        assert!(s.item("m2").unwrap().is_unread());
        assert_eq!(s.len(), 3);
        assert_eq!(report.selected, Some(1));
        assert_eq!(report.message, "Marked read 2, 1 failure");
    }

    #[tokio::test]
    async fn test_forward_all() {
        let s = store(&[false, false]);
        let mailbox = FakeMailbox::with_items(s.items().to_vec());
        let forwarder = FakeForwarder::default();

        let mut bulk = BulkCoordinator::new();
        bulk.select_all(&s);
        let plan = bulk
            .plan(
                BulkRequest::Forward(ForwardOptions {
                    to: "team".into(),
                    note: None,
                }),
                &s,
                true,
            )
            .unwrap();
        let outcome = plan
            .execute(&mailbox, Some(&forwarder as &dyn Forwarder), |_, _| {})
            .await;
        assert!(outcome.failures.is_empty());
        assert_eq!(forwarder.forwarded(), vec!["m0", "m1"]);
    }
}
