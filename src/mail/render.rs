//! Content rendering collaborator and the default html2text-based renderer.

use serde::{Deserialize, Serialize};

use super::types::{Content, Item};
use crate::constants::MIN_RENDER_WIDTH;

/// Per-item choice of which body part to display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPreference {
    /// Prefer the text/plain part
    #[default]
    Plain,
    /// Prefer the HTML part, converted to text
    Rich,
}

impl RenderPreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Plain => Self::Rich,
            Self::Rich => Self::Plain,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Rich => "rich",
        }
    }
}

/// Turns an item and its content into display text for a given width
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        item: &Item,
        content: &Content,
        width: u16,
        preference: RenderPreference,
    ) -> String;
}

/// Default renderer: header block followed by the preferred body part
#[derive(Debug, Clone, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn html_to_text(html: &str, width: usize) -> String {
        html2text::config::plain()
            .string_from_read(html.as_bytes(), width)
            .unwrap_or_else(|e| {
                tracing::debug!("html2text failed, showing raw html: {}", e);
                html.to_string()
            })
    }

    fn body(content: &Content, width: usize, preference: RenderPreference) -> String {
        let text = content.text.as_deref().filter(|t| !t.trim().is_empty());
        let html = content.html.as_deref().filter(|h| !h.trim().is_empty());

        match (preference, text, html) {
            (RenderPreference::Rich, _, Some(html)) => Self::html_to_text(html, width),
            (_, Some(text), _) => text.to_string(),
            (_, None, Some(html)) => Self::html_to_text(html, width),
            (_, None, None) => "[No content]".to_string(),
        }
    }
}

impl Renderer for TextRenderer {
    fn render(
        &self,
        item: &Item,
        content: &Content,
        width: u16,
        preference: RenderPreference,
    ) -> String {
        let width = width.max(MIN_RENDER_WIDTH) as usize;
        let mut out = String::new();
        out.push_str(&format!("From: {}\n", item.from));
        out.push_str(&format!("Subject: {}\n", item.subject));
        if !item.labels.is_empty() {
            out.push_str(&format!("Labels: {}\n", item.labels.join(", ")));
        }
        out.push('\n');
        out.push_str(&Self::body(content, width, preference));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both_parts() -> Content {
        Content {
            text: Some("plain body".to_string()),
            html: Some("<p>html <b>body</b></p>".to_string()),
        }
    }

    #[test]
    fn test_plain_prefers_text_part() {
        let item = Item::new("a", "Hi");
        let out = TextRenderer.render(&item, &both_parts(), 80, RenderPreference::Plain);
        assert!(out.contains("Subject: Hi"));
        assert!(out.contains("plain body"));
        assert!(!out.contains("html"));
    }

    #[test]
    fn test_rich_prefers_html_part() {
        let item = Item::new("a", "Hi");
        let out = TextRenderer.render(&item, &both_parts(), 80, RenderPreference::Rich);
        assert!(out.contains("html"));
        assert!(!out.contains("plain body"));
    }

    #[test]
    fn test_falls_back_when_part_missing() {
        let item = Item::new("a", "Hi");
        let html_only = Content {
            text: None,
            html: Some("<p>only html</p>".to_string()),
        };
        let out = TextRenderer.render(&item, &html_only, 80, RenderPreference::Plain);
        assert!(out.contains("only html"));

        let out = TextRenderer.render(&item, &Content::default(), 80, RenderPreference::Rich);
        assert!(out.contains("[No content]"));
    }

    #[test]
    fn test_toggle() {
        assert_eq!(RenderPreference::Plain.toggled(), RenderPreference::Rich);
        assert_eq!(RenderPreference::Rich.toggled(), RenderPreference::Plain);
    }
}
