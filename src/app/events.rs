//! Results handed from background tasks to the owner loop

use super::bulk::BulkOutcome;
use crate::ai::GenerationKind;
use crate::error::MailError;
use crate::mail::{Content, Cursor, Item, Mutation};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A chunk of a page for listing `generation`
    PageItems { generation: u64, items: Vec<Item> },
    PageFinished { generation: u64, next_cursor: Cursor },
    PageFailed { generation: u64, error: MailError },

    /// Content fetched; metadata rides along when it could be refreshed
    ContentLoaded {
        id: String,
        content: Content,
        item: Option<Item>,
    },
    ContentFailed { id: String, error: MailError },

    MutationApplied { id: String, mutation: Mutation },
    MutationFailed {
        id: String,
        mutation: Mutation,
        error: MailError,
    },

    Forwarded { id: String },
    ForwardFailed { id: String, error: MailError },

    SummaryReady { id: String, text: String },
    LabelsReady { id: String, labels: Vec<String> },
    GenerationFailed {
        kind: GenerationKind,
        id: String,
        error: MailError,
    },

    BulkProgress { done: usize, total: usize },
    BulkFinished(BulkOutcome),

    /// A background task panicked. Page tasks carry their listing generation.
    TaskFailed {
        task: &'static str,
        generation: Option<u64>,
        error: String,
    },
}

/// Task names carried by [`AppEvent::TaskFailed`]
pub mod task {
    pub const PAGE: &str = "page";
    pub const CONTENT: &str = "content";
    pub const MUTATION: &str = "mutation";
    pub const FORWARD: &str = "forward";
    pub const SUMMARY: &str = "summary";
    pub const LABELS: &str = "labels";
    pub const BULK: &str = "bulk";
}
