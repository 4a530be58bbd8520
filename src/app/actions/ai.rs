//! AI feature action handlers

use std::collections::BTreeSet;

use crate::ai::{GenerationKind, parse_labels, prompts};
use crate::app::events::{AppEvent, task};
use crate::app::state::PreviewMode;
use crate::constants::DEFAULT_PREVIEW_WIDTH;
use crate::error::MailError;
use crate::mail::RenderPreference;

use super::super::App;

impl App {
    /// Toggle between message content and its AI summary in the preview
    pub(super) fn toggle_summary(&mut self) {
        if self.preview_mode == PreviewMode::Summary {
            self.preview_mode = PreviewMode::Content;
            return;
        }
        if !self.ai_ready(GenerationKind::Summary) {
            return;
        }
        let Some(id) = self.selected_item_id() else {
            return;
        };
        self.preview_mode = PreviewMode::Summary;
        self.request_summary(&id);
    }

    pub(crate) fn request_summary(&mut self, id: &str) {
        self.request_generation(GenerationKind::Summary, id);
    }

    pub(super) fn suggest_labels(&mut self) {
        if !self.ai_ready(GenerationKind::Labels) {
            return;
        }
        let Some(id) = self.selected_item_id() else {
            return;
        };
        if let Some(labels) = self.cache.labels(&id).map(<[String]>::to_vec) {
            self.show_label_suggestions(&labels);
            return;
        }
        self.status.set_message("Suggesting labels…");
        self.request_generation(GenerationKind::Labels, &id);
    }

    /// Check the generator is configured and the feature enabled
    fn ai_ready(&mut self, kind: GenerationKind) -> bool {
        if self.collab.generator.is_none() {
            self.report(MailError::unavailable("AI generation"));
            return false;
        }
        let enabled = match kind {
            GenerationKind::Summary => self.config.ai.enable_summaries,
            GenerationKind::Labels => self.config.ai.enable_labels,
        };
        if !enabled {
            self.report(MailError::unavailable(format!(
                "{} (disabled in config)",
                kind.label()
            )));
        }
        enabled
    }

    /// Generate once per (kind, id). Waits for content if it is not cached.
    pub(crate) fn request_generation(&mut self, kind: GenerationKind, id: &str) {
        let Some(generator) = self.collab.generator.clone() else {
            self.report(MailError::unavailable("AI generation"));
            return;
        };
        let cached = match kind {
            GenerationKind::Summary => self.cache.summary(id).is_some(),
            GenerationKind::Labels => self.cache.labels(id).is_some(),
        };
        if cached || self.cache.is_in_flight(kind.into(), id) {
            return;
        }
        let Some(item) = self.store.item(id) else {
            return;
        };
        let Some(content) = self.cache.content(id) else {
            tracing::debug!("{} for {} waits for content", kind.label(), id);
            self.pending_generation.insert((kind, id.to_string()));
            self.request_preview(id);
            return;
        };

        let body = self
            .collab
            .renderer
            .render(item, content, DEFAULT_PREVIEW_WIDTH, RenderPreference::Plain);
        let prompt = match kind {
            GenerationKind::Summary => {
                prompts::summary(item, &body, self.config.ai.summary_max_tokens)
            }
            GenerationKind::Labels => {
                let known = self.known_labels();
                prompts::labels(item, &body, &known, self.config.ai.labels_max_tokens)
            }
        };

        self.cache.begin(kind.into(), id);
        tracing::debug!("Requesting {} for {}", kind.label(), id);

        let id = id.to_string();
        let task_name = match kind {
            GenerationKind::Summary => task::SUMMARY,
            GenerationKind::Labels => task::LABELS,
        };
        self.dispatcher.spawn(task_name, async move {
            let result = generator.generate(prompt).await;
            match (kind, result) {
                (GenerationKind::Summary, Ok(text)) => AppEvent::SummaryReady {
                    id,
                    text: text.trim().to_string(),
                },
                (GenerationKind::Labels, Ok(text)) => AppEvent::LabelsReady {
                    id,
                    labels: parse_labels(&text),
                },
                (kind, Err(error)) => AppEvent::GenerationFailed { kind, id, error },
            }
        });
    }

    pub(crate) fn show_label_suggestions(&mut self, labels: &[String]) {
        if labels.is_empty() {
            self.status.set_message("No label suggestions");
        } else {
            self.status
                .set_message(format!("Suggested labels: {}", labels.join(", ")));
        }
    }

    /// Labels already in use across the loaded list
    fn known_labels(&self) -> Vec<String> {
        self.store
            .items()
            .iter()
            .flat_map(|item| item.labels.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
