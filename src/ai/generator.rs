//! Text generation collaborator

use async_trait::async_trait;

use crate::constants::MAX_SUGGESTED_LABELS;
use crate::error::MailResult;

/// A single generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
    pub max_tokens: u32,
}

/// Produces text for a prompt (summaries, label suggestions)
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: Prompt) -> MailResult<String>;
}

/// What a generation request produces for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    Summary,
    Labels,
}

impl GenerationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Labels => "Label suggestions",
        }
    }
}

/// Parse a comma or newline separated label reply
pub fn parse_labels(reply: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for raw in reply.split([',', '\n']) {
        let label = raw
            .trim()
            .trim_start_matches(['-', '*', '#'])
            .trim()
            .trim_matches('"');
        if label.is_empty() || labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            continue;
        }
        labels.push(label.to_string());
        if labels.len() == MAX_SUGGESTED_LABELS {
            break;
        }
    }
    labels
}
