//! Per-message caches owned by the app loop.
//!
//! Entries are keyed by item id, created on first access and dropped only by
//! explicit invalidation. In-flight markers make sure each (kind, id) pair has
//! at most one background fetch or generation running.

use std::collections::{HashMap, HashSet};

use crate::ai::GenerationKind;
use crate::mail::{Content, RenderPreference};

/// Background work that is guarded per item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InFlight {
    Content,
    Summary,
    Labels,
}

impl From<GenerationKind> for InFlight {
    fn from(kind: GenerationKind) -> Self {
        match kind {
            GenerationKind::Summary => Self::Summary,
            GenerationKind::Labels => Self::Labels,
        }
    }
}

/// Rendered text together with the inputs it was rendered for
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rendered {
    width: u16,
    preference: RenderPreference,
    text: String,
}

/// Generated data derived from an item's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestion {
    pub summary: Option<String>,
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct CacheLayer {
    content: HashMap<String, Content>,
    rendered: HashMap<String, Rendered>,
    suggestions: HashMap<String, Suggestion>,
    preferences: HashMap<String, RenderPreference>,
    default_preference: RenderPreference,
    in_flight: HashSet<(InFlight, String)>,
}

impl CacheLayer {
    pub fn new(default_preference: RenderPreference) -> Self {
        Self {
            default_preference,
            ..Default::default()
        }
    }

    pub fn content(&self, id: &str) -> Option<&Content> {
        self.content.get(id)
    }

    pub fn store_content(&mut self, id: &str, content: Content) {
        // New content makes any earlier rendering stale
        self.rendered.remove(id);
        self.content.insert(id.to_string(), content);
    }

    /// Rendered text, if it was produced for this width and the item's
    /// current preference
    pub fn rendered(&self, id: &str, width: u16) -> Option<&str> {
        let preference = self.preference(id);
        self.rendered
            .get(id)
            .filter(|r| r.width == width && r.preference == preference)
            .map(|r| r.text.as_str())
    }

    pub fn store_rendered(&mut self, id: &str, width: u16, text: String) {
        let preference = self.preference(id);
        self.rendered.insert(
            id.to_string(),
            Rendered {
                width,
                preference,
                text,
            },
        );
    }

    pub fn preference(&self, id: &str) -> RenderPreference {
        self.preferences
            .get(id)
            .copied()
            .unwrap_or(self.default_preference)
    }

    /// Flip the item's render preference; only its rendered text is dropped
    pub fn toggle_preference(&mut self, id: &str) -> RenderPreference {
        let next = self.preference(id).toggled();
        self.preferences.insert(id.to_string(), next);
        self.rendered.remove(id);
        next
    }

    pub fn summary(&self, id: &str) -> Option<&str> {
        self.suggestions.get(id)?.summary.as_deref()
    }

    pub fn labels(&self, id: &str) -> Option<&[String]> {
        self.suggestions.get(id)?.labels.as_deref()
    }

    pub fn store_summary(&mut self, id: &str, summary: String) {
        self.suggestions.entry(id.to_string()).or_default().summary = Some(summary);
    }

    pub fn store_labels(&mut self, id: &str, labels: Vec<String>) {
        self.suggestions.entry(id.to_string()).or_default().labels = Some(labels);
    }

    /// Mark work as started. Returns false if it is already running.
    pub fn begin(&mut self, kind: InFlight, id: &str) -> bool {
        self.in_flight.insert((kind, id.to_string()))
    }

    pub fn finish(&mut self, kind: InFlight, id: &str) {
        self.in_flight.remove(&(kind, id.to_string()));
    }

    pub fn is_in_flight(&self, kind: InFlight, id: &str) -> bool {
        self.in_flight.contains(&(kind, id.to_string()))
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Drop every marker of one kind (after a task of that kind panicked)
    pub fn clear_in_flight(&mut self, kind: InFlight) {
        self.in_flight.retain(|(k, _)| *k != kind);
    }

    /// Drop everything known about an item
    pub fn invalidate(&mut self, id: &str) {
        self.content.remove(id);
        self.rendered.remove(id);
        self.suggestions.remove(id);
        self.preferences.remove(id);
    }
}
