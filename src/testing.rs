//! In-memory collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ai::{Generator, Prompt};
use crate::error::{MailError, MailResult};
use crate::mail::{Content, Cursor, ForwardOptions, Forwarder, Item, Mailbox, Page};

/// Mailbox backed by a vector. Cursors are stringified offsets.
#[derive(Default)]
pub struct FakeMailbox {
    items: Mutex<Vec<Item>>,
    content: Mutex<HashMap<String, Content>>,
    failing: Mutex<HashSet<String>>,
    missing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeMailbox {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    /// Calls touching `id` fail with a transient error
    pub fn fail_on(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    /// Calls touching `id` report the item as gone
    pub fn missing(&self, id: &str) {
        self.missing.lock().unwrap().insert(id.to_string());
    }

    /// Content fetches for `id` panic
    pub fn panic_on(&self, id: &str) {
        self.panicking.lock().unwrap().insert(id.to_string());
    }

    pub fn set_content(&self, id: &str, content: Content) {
        self.content.lock().unwrap().insert(id.to_string(), content);
    }

    /// Every call made so far, as "method:arg"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        let prefix = format!("{}:", method);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .count()
    }

    fn record(&self, method: &str, arg: &str) -> MailResult<()> {
        self.calls.lock().unwrap().push(format!("{}:{}", method, arg));
        if self.missing.lock().unwrap().contains(arg) {
            return Err(MailError::not_found(arg));
        }
        if self.failing.lock().unwrap().contains(arg) {
            return Err(MailError::transient(format!("{} failed for {}", method, arg)));
        }
        Ok(())
    }

    fn page(&self, query: Option<&str>, page_size: usize, cursor: &Cursor) -> Page {
        let offset: usize = cursor.as_str().parse().unwrap_or(0);
        let items = self.items.lock().unwrap();
        let matching: Vec<&Item> = items
            .iter()
            .filter(|item| {
                query.is_none_or(|q| item.row_text().to_lowercase().contains(&q.to_lowercase()))
            })
            .collect();
        let end = (offset + page_size).min(matching.len());
        let page_items = matching[offset.min(end)..end]
            .iter()
            .map(|item| (*item).clone())
            .collect();
        let next_cursor = if end < matching.len() {
            Cursor::new(end.to_string())
        } else {
            Cursor::end()
        };
        Page {
            items: page_items,
            next_cursor,
        }
    }
}

#[async_trait]
impl Mailbox for FakeMailbox {
    async fn list_page(&self, page_size: usize, cursor: Cursor) -> MailResult<Page> {
        self.record("list_page", cursor.as_str())?;
        Ok(self.page(None, page_size, &cursor))
    }

    async fn search_page(
        &self,
        query: String,
        page_size: usize,
        cursor: Cursor,
    ) -> MailResult<Page> {
        self.record("search_page", &query)?;
        Ok(self.page(Some(&query), page_size, &cursor))
    }

    async fn get_metadata(&self, id: String) -> MailResult<Item> {
        self.record("get_metadata", &id)?;
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| MailError::not_found(id.clone()))
    }

    async fn get_content(&self, id: String) -> MailResult<Content> {
        if self.panicking.lock().unwrap().contains(&id) {
            panic!("content fetch exploded for {}", id);
        }
        self.record("get_content", &id)?;
        Ok(self
            .content
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Content::text(format!("body of {}", id))))
    }

    async fn archive(&self, id: String) -> MailResult<()> {
        self.record("archive", &id)
    }

    async fn trash(&self, id: String) -> MailResult<()> {
        self.record("trash", &id)
    }

    async fn mark_read(&self, id: String) -> MailResult<()> {
        self.record("mark_read", &id)
    }

    async fn mark_unread(&self, id: String) -> MailResult<()> {
        self.record("mark_unread", &id)
    }

    async fn set_starred(&self, id: String, _starred: bool) -> MailResult<()> {
        self.record("set_starred", &id)
    }

    async fn apply_label(&self, id: String, _label: String) -> MailResult<()> {
        self.record("apply_label", &id)
    }
}

/// Generator returning a fixed reply and counting calls
pub struct FakeGenerator {
    reply: String,
    calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, _prompt: Prompt) -> MailResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.reply.clone())
    }
}

/// Forwarder that records forwarded ids
#[derive(Default)]
pub struct FakeForwarder {
    forwarded: Mutex<Vec<String>>,
}

impl FakeForwarder {
    pub fn forwarded(&self) -> Vec<String> {
        self.forwarded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forwarder for FakeForwarder {
    async fn forward(&self, id: String, _options: ForwardOptions) -> MailResult<()> {
        self.forwarded.lock().unwrap().push(id);
        Ok(())
    }
}

/// Items `m0..mN` with subject "subject N"
pub fn items(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let mut item = Item::new(format!("m{}", i), format!("subject {}", i));
            item.from = format!("sender{}@example.com", i);
            item
        })
        .collect()
}
