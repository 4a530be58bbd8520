use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::config::KeybindingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Listing
    Open,
    Back,
    Quit,
    Refresh,
    LoadMore,
    Search,
    Filter,

    // Single message (or the bulk selection when one exists)
    Archive,
    Trash,
    ToggleRead,
    ToggleStar,
    Label,
    Forward,

    // Bulk selection
    ToggleSelect,
    SelectAll,

    // Preview
    TogglePreference,

    // AI features
    ToggleSummary,
    SuggestLabels,

    // Help
    Help,
}

/// Help popup sections, in display order
const CATEGORIES: [&str; 6] = ["Navigation", "Listing", "Messages", "Selection", "AI", "Help"];

impl Action {
    pub fn description(self) -> &'static str {
        match self {
            Self::Up => "Move up",
            Self::Down => "Move down",
            Self::Top => "Go to top",
            Self::Bottom => "Go to bottom",
            Self::PageUp => "Page up",
            Self::PageDown => "Page down",
            Self::Open => "Reload preview",
            Self::Back => "Cancel / leave search",
            Self::Quit => "Quit",
            Self::Refresh => "Reload listing",
            Self::LoadMore => "Load more messages",
            Self::Search => "Search on server",
            Self::Filter => "Filter loaded messages",
            Self::Archive => "Archive",
            Self::Trash => "Move to trash",
            Self::ToggleRead => "Toggle read/unread",
            Self::ToggleStar => "Toggle star",
            Self::Label => "Apply label",
            Self::Forward => "Forward",
            Self::ToggleSelect => "Select / deselect",
            Self::SelectAll => "Select all",
            Self::TogglePreference => "Toggle plain/rich view",
            Self::ToggleSummary => "Toggle AI summary",
            Self::SuggestLabels => "Suggest labels (AI)",
            Self::Help => "Toggle help",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Up | Self::Down | Self::Top | Self::Bottom | Self::PageUp | Self::PageDown => {
                CATEGORIES[0]
            }
            Self::Open
            | Self::Back
            | Self::Quit
            | Self::Refresh
            | Self::LoadMore
            | Self::Search
            | Self::Filter => CATEGORIES[1],
            Self::Archive
            | Self::Trash
            | Self::ToggleRead
            | Self::ToggleStar
            | Self::Label
            | Self::Forward
            | Self::TogglePreference => CATEGORIES[2],
            Self::ToggleSelect | Self::SelectAll => CATEGORIES[3],
            Self::ToggleSummary | Self::SuggestLabels => CATEGORIES[4],
            Self::Help => CATEGORIES[5],
        }
    }
}

/// Key tables. `C-x` is Ctrl+x, an uppercase letter implies Shift.
const VIM: &[(&str, Action)] = &[
    ("j", Action::Down),
    ("k", Action::Up),
    ("g", Action::Top),
    ("G", Action::Bottom),
    ("C-d", Action::PageDown),
    ("C-u", Action::PageUp),
    ("Enter", Action::Open),
    ("Esc", Action::Back),
    ("q", Action::Quit),
    ("C-r", Action::Refresh),
    ("N", Action::LoadMore),
    ("/", Action::Search),
    ("f", Action::Filter),
    ("e", Action::Archive),
    ("d", Action::Trash),
    ("m", Action::ToggleRead),
    ("s", Action::ToggleStar),
    ("l", Action::Label),
    ("F", Action::Forward),
    ("x", Action::ToggleSelect),
    ("Space", Action::ToggleSelect),
    ("X", Action::SelectAll),
    ("v", Action::TogglePreference),
    ("T", Action::ToggleSummary),
    ("L", Action::SuggestLabels),
    ("?", Action::Help),
];

const ARROWS: &[(&str, Action)] = &[
    ("Down", Action::Down),
    ("Up", Action::Up),
    ("Home", Action::Top),
    ("End", Action::Bottom),
    ("PgDn", Action::PageDown),
    ("PgUp", Action::PageUp),
    ("Enter", Action::Open),
    ("Esc", Action::Back),
    ("C-q", Action::Quit),
    ("F5", Action::Refresh),
    ("F6", Action::LoadMore),
    ("F3", Action::Search),
    ("/", Action::Search),
    ("C-f", Action::Filter),
    ("C-e", Action::Archive),
    ("Delete", Action::Trash),
    ("C-u", Action::ToggleRead),
    ("C-s", Action::ToggleStar),
    ("C-l", Action::Label),
    ("C-w", Action::Forward),
    ("Space", Action::ToggleSelect),
    ("C-a", Action::SelectAll),
    ("F4", Action::TogglePreference),
    ("F7", Action::ToggleSummary),
    ("F8", Action::SuggestLabels),
    ("F1", Action::Help),
    ("?", Action::Help),
];

/// A displayable keybinding entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: String,
    pub category: &'static str,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
    table: &'static [(&'static str, Action)],
}

impl KeyBindings {
    pub fn new(mode: &KeybindingMode) -> Self {
        let table = match mode {
            KeybindingMode::Vim => VIM,
            KeybindingMode::Arrows => ARROWS,
        };
        let bindings = table
            .iter()
            .filter_map(|&(spec, action)| parse_key(spec).map(|event| (event, action)))
            .collect();
        Self { bindings, table }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// Every binding for the help popup, grouped by category in table order
    pub fn all_bindings(&self) -> Vec<KeybindingEntry> {
        let mut entries: Vec<KeybindingEntry> = self
            .table
            .iter()
            .map(|&(spec, action)| KeybindingEntry {
                key: display_key(spec),
                description: action.description().to_string(),
                category: action.category(),
            })
            .collect();
        entries.sort_by_key(|e| CATEGORIES.iter().position(|c| *c == e.category));
        entries
    }
}

fn parse_key(spec: &str) -> Option<KeyEvent> {
    if let Some(rest) = spec.strip_prefix("C-") {
        let c = single_char(rest)?;
        return Some(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }
    let code = match spec {
        "Space" => KeyCode::Char(' '),
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Delete" => KeyCode::Delete,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PgUp" => KeyCode::PageUp,
        "PgDn" => KeyCode::PageDown,
        _ => match spec.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
            Some(n) => KeyCode::F(n),
            None => {
                let c = single_char(spec)?;
                let modifiers = if c.is_ascii_uppercase() {
                    KeyModifiers::SHIFT
                } else {
                    KeyModifiers::NONE
                };
                return Some(KeyEvent::new(KeyCode::Char(c), modifiers));
            }
        },
    };
    Some(KeyEvent::new(code, KeyModifiers::NONE))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn display_key(spec: &str) -> String {
    match spec.strip_prefix("C-") {
        Some(rest) => format!("Ctrl+{}", rest),
        None => spec.to_string(),
    }
}
