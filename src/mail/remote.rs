//! Remote collaborators: the hosted mailbox and the forwarding integration.
//!
//! Both are `#[async_trait]` so the app can hold them as `Arc<dyn ...>` in a
//! typed registry.

use async_trait::async_trait;

use super::types::{Content, Cursor, Item, ItemFlags, Page};
use crate::error::MailResult;

/// The hosted mailbox service
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// One page of the default listing
    async fn list_page(&self, page_size: usize, cursor: Cursor) -> MailResult<Page>;

    /// One page of a server-side search
    async fn search_page(
        &self,
        query: String,
        page_size: usize,
        cursor: Cursor,
    ) -> MailResult<Page>;

    async fn get_metadata(&self, id: String) -> MailResult<Item>;

    async fn get_content(&self, id: String) -> MailResult<Content>;

    async fn archive(&self, id: String) -> MailResult<()>;

    async fn trash(&self, id: String) -> MailResult<()>;

    async fn mark_read(&self, id: String) -> MailResult<()>;

    async fn mark_unread(&self, id: String) -> MailResult<()>;

    async fn set_starred(&self, id: String, starred: bool) -> MailResult<()>;

    async fn apply_label(&self, id: String, label: String) -> MailResult<()>;
}

/// Options for forwarding a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardOptions {
    /// Destination (address, channel, ...) understood by the forwarder
    pub to: String,
    /// Optional note prepended to the forwarded message
    pub note: Option<String>,
}

/// Chat/mail forwarding integration
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, id: String, options: ForwardOptions) -> MailResult<()>;
}

/// A single-item change applied through the mailbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Archive,
    Trash,
    MarkRead,
    MarkUnread,
    Star,
    Unstar,
    Label(String),
}

impl Mutation {
    /// Whether success removes the item from the current listing
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Archive | Self::Trash)
    }

    /// Flag change made by this mutation, if any
    pub fn flag_change(&self) -> Option<(ItemFlags, bool)> {
        match self {
            Self::MarkRead => Some((ItemFlags::UNREAD, false)),
            Self::MarkUnread => Some((ItemFlags::UNREAD, true)),
            Self::Star => Some((ItemFlags::STARRED, true)),
            Self::Unstar => Some((ItemFlags::STARRED, false)),
            Self::Archive | Self::Trash | Self::Label(_) => None,
        }
    }

    /// Issue the remote call for one item
    pub async fn apply(&self, mailbox: &dyn Mailbox, id: String) -> MailResult<()> {
        match self {
            Self::Archive => mailbox.archive(id).await,
            Self::Trash => mailbox.trash(id).await,
            Self::MarkRead => mailbox.mark_read(id).await,
            Self::MarkUnread => mailbox.mark_unread(id).await,
            Self::Star => mailbox.set_starred(id, true).await,
            Self::Unstar => mailbox.set_starred(id, false).await,
            Self::Label(label) => mailbox.apply_label(id, label.clone()).await,
        }
    }

    /// Present-progressive verb for progress messages ("Archiving")
    pub fn progress_verb(&self) -> &'static str {
        match self {
            Self::Archive => "Archiving",
            Self::Trash => "Trashing",
            Self::MarkRead => "Marking read",
            Self::MarkUnread => "Marking unread",
            Self::Star => "Starring",
            Self::Unstar => "Unstarring",
            Self::Label(_) => "Labelling",
        }
    }

    /// Past-tense verb for completion messages ("Archived")
    pub fn done_verb(&self) -> &'static str {
        match self {
            Self::Archive => "Archived",
            Self::Trash => "Trashed",
            Self::MarkRead => "Marked read",
            Self::MarkUnread => "Marked unread",
            Self::Star => "Starred",
            Self::Unstar => "Unstarred",
            Self::Label(_) => "Labelled",
        }
    }
}
