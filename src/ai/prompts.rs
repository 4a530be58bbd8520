//! System prompts for AI features

use super::generator::Prompt;
use crate::mail::Item;

/// System prompt for single message summarization
pub const SUMMARY_SYSTEM: &str = r#"You are an email summarization assistant. Summarize the email concisely in 2-5 sentences, capturing the key points and any action items. Be direct and factual. Do not include greetings or sign-offs in your summary."#;

/// System prompt for label suggestions
pub const LABELS_SYSTEM: &str = r#"You are an email triage assistant. Suggest up to three short labels for the email. Prefer labels from the provided list when they fit. Reply with the labels only, separated by commas, without explanations."#;

/// Message bodies beyond this many characters are cut before prompting.
const MAX_BODY_CHARS: usize = 12_000;

fn clip(body: &str) -> &str {
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

pub fn summary(item: &Item, body: &str, max_tokens: u32) -> Prompt {
    Prompt {
        system: SUMMARY_SYSTEM,
        user: format!(
            "From: {}\nSubject: {}\n\n{}",
            item.from,
            item.subject,
            clip(body)
        ),
        max_tokens,
    }
}

pub fn labels(item: &Item, body: &str, known: &[String], max_tokens: u32) -> Prompt {
    let known = if known.is_empty() {
        "(none)".to_string()
    } else {
        known.join(", ")
    };
    Prompt {
        system: LABELS_SYSTEM,
        user: format!(
            "Existing labels: {}\n\nFrom: {}\nSubject: {}\n\n{}",
            known,
            item.from,
            item.subject,
            clip(body)
        ),
        max_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_long_body() {
        let body = "x".repeat(MAX_BODY_CHARS + 50);
        assert_eq!(clip(&body).len(), MAX_BODY_CHARS);
        assert_eq!(clip("short"), "short");
    }

    #[test]
    fn test_labels_prompt_lists_known_labels() {
        let item = Item::new("a", "Invoice");
        let prompt = labels(&item, "pay me", &["finance".into(), "work".into()], 50);
        assert!(prompt.user.contains("Existing labels: finance, work"));
        assert!(prompt.user.contains("Subject: Invoice"));
        assert_eq!(prompt.system, LABELS_SYSTEM);
    }
}
