//! Application state types
//!
//! The UI layer renders from [`ViewState`], an owned snapshot produced by the
//! app after every change. The UI imports from the app layer, not vice versa.

use std::time::Instant;

use crate::constants::ERROR_TTL_SECS;
use crate::input::KeybindingEntry;

/// Severity of the status line message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusLevel {
    #[default]
    Info,
    Warning,
}

/// Loading, error, and status message state
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub loading: bool,
    pub error: Option<String>,
    pub error_time: Option<Instant>,
    pub message: String,
    pub level: StatusLevel,
    /// Persists after error bar expires - shown as indicator in status bar
    pub has_unacknowledged_error: bool,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(Instant::now());
        self.has_unacknowledged_error = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Acknowledge the error indicator (clear the persistent flag)
    /// Call this on user input to dismiss the status bar indicator
    pub fn acknowledge_error(&mut self) {
        self.has_unacknowledged_error = false;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
        self.level = StatusLevel::Info;
    }

    pub fn set_warning(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
        self.level = StatusLevel::Warning;
    }
}

/// Which text prompt is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    RemoteSearch,
    LocalFilter,
    Label,
    Forward,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::RemoteSearch => "Search",
            Self::LocalFilter => "Filter",
            Self::Label => "Label",
            Self::Forward => "Forward to",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Prompt {
        kind: PromptKind,
        buffer: String,
    },
    Help {
        scroll: usize,
    },
}

impl InputMode {
    pub fn is_prompt(&self) -> bool {
        matches!(self, Self::Prompt { .. })
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }
}

/// What the preview pane shows for the selected item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    Content,
    Summary,
}

/// One list row, pre-formatted for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowView {
    pub from: String,
    pub subject: String,
    pub snippet: String,
    pub date: String,
    pub labels: Vec<String>,
    pub unread: bool,
    pub starred: bool,
    pub important: bool,
    /// Part of the bulk selection
    pub marked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewView {
    pub title: String,
    /// Rendered text; `None` while it is being fetched or generated
    pub body: Option<String>,
    pub loading: bool,
    /// Extra line under the title (render preference, suggestions)
    pub note: Option<String>,
}

/// Owned snapshot of everything the UI draws
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub rows: Vec<RowView>,
    pub selected: Option<usize>,
    pub preview: Option<PreviewView>,
    pub status: StatusState,
    /// Active search/filter description
    pub mode_label: Option<String>,
    pub loading: bool,
    pub more_available: bool,
    pub marked: usize,
    pub bulk_running: bool,
    pub input: InputMode,
    /// Filled only while help is open
    pub help: Vec<KeybindingEntry>,
    pub split_ratio: u16,
}
