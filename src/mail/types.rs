use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ItemFlags: u8 {
        const UNREAD = 0b0000_0001;
        const STARRED = 0b0000_0010;
        const IMPORTANT = 0b0000_0100;
    }
}

/// One mailbox message as tracked by the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub snippet: String,
    /// Unix timestamp (seconds)
    pub date: i64,
    pub flags: ItemFlags,
    pub labels: Vec<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: String::new(),
            subject: subject.into(),
            snippet: String::new(),
            date: 0,
            flags: ItemFlags::empty(),
            labels: Vec::new(),
        }
    }

    pub fn is_unread(&self) -> bool {
        self.flags.contains(ItemFlags::UNREAD)
    }

    pub fn is_starred(&self) -> bool {
        self.flags.contains(ItemFlags::STARRED)
    }

    pub fn set_flag(&mut self, flag: ItemFlags, present: bool) {
        self.flags.set(flag, present);
    }

    /// Add a label unless already present
    pub fn add_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            self.labels.push(label.to_string());
        }
    }

    /// Text shown in the list row; also what local filters match against
    pub fn row_text(&self) -> String {
        let mut text = format!("{} {}", self.from, self.subject);
        if !self.snippet.is_empty() {
            text.push_str(" - ");
            text.push_str(&self.snippet);
        }
        for label in &self.labels {
            text.push_str(" [");
            text.push_str(label);
            text.push(']');
        }
        text
    }

    /// Formatted date for list display
    pub fn display_date(&self, format: &str) -> String {
        chrono::DateTime::from_timestamp(self.date, 0)
            .map(|dt| dt.with_timezone(&chrono::Local).format(format).to_string())
            .unwrap_or_default()
    }
}

/// Raw message content as returned by the mailbox
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub text: Option<String>,
    pub html: Option<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty)
            && self.html.as_deref().is_none_or(str::is_empty)
    }
}

/// Opaque pagination token. Empty means the listing is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The exhausted cursor
    pub fn end() -> Self {
        Self(String::new())
    }

    pub fn is_end(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a listing or search
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Item>,
    pub next_cursor: Cursor,
}
