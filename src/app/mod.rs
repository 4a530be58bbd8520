//! Application core - owns all list, search, selection and cache state
//!
//! `App` is the single writer: user actions and background results are
//! applied here one at a time, and the UI only ever sees an owned
//! [`ViewState`] snapshot.

mod actions;
pub mod bulk;
pub mod dispatch;
mod event_loop;
pub mod events;
mod handlers;
pub mod render_thread;
pub mod search;
pub mod state;
pub mod store;
#[cfg(test)]
mod tests;

use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

use render_thread::RenderThread;

use crate::ai::{GenerationKind, Generator, OpenRouterClient};
use crate::cache::{CacheLayer, InFlight};
use crate::config::Config;
use crate::constants::{DEFAULT_PREVIEW_WIDTH, MIN_SPLIT_VIEW_WIDTH};
use crate::input::KeyBindings;
use crate::mail::{Forwarder, Mailbox, Renderer, TextRenderer};
use bulk::BulkCoordinator;
use dispatch::{Dispatcher, EventQueue};
use search::SearchController;
use state::{InputMode, PreviewMode, PreviewView, RowView, StatusState, ViewState};
use store::ListStore;

/// External services the app talks to, fixed at construction
#[derive(Clone)]
pub struct Collaborators {
    pub mailbox: Arc<dyn Mailbox>,
    pub renderer: Arc<dyn Renderer>,
    pub generator: Option<Arc<dyn Generator>>,
    pub forwarder: Option<Arc<dyn Forwarder>>,
}

impl Collaborators {
    /// Mailbox with the default renderer and no optional services
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self {
            mailbox,
            renderer: Arc::new(TextRenderer),
            generator: None,
            forwarder: None,
        }
    }

    /// Add the OpenRouter generator when AI features are configured
    pub fn from_config(mailbox: Arc<dyn Mailbox>, config: &Config) -> Self {
        let mut collaborators = Self::new(mailbox);
        if config.ai.is_enabled()
            && let Some(api_key) = config.ai.api_key()
        {
            tracing::info!("AI features enabled with model {}", config.ai.model);
            collaborators.generator = Some(Arc::new(OpenRouterClient::new(
                api_key,
                config.ai.model.clone(),
            )));
        }
        collaborators
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_forwarder(mut self, forwarder: Arc<dyn Forwarder>) -> Self {
        self.forwarder = Some(forwarder);
        self
    }
}

pub struct App {
    pub(crate) config: Config,
    pub(crate) collab: Collaborators,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) events: EventQueue,
    pub(crate) store: ListStore,
    pub(crate) search: SearchController,
    pub(crate) bulk: BulkCoordinator,
    pub(crate) cache: CacheLayer,
    /// Index into `store`
    pub(crate) selected: Option<usize>,
    pub(crate) status: StatusState,
    pub(crate) input: InputMode,
    pub(crate) preview_mode: PreviewMode,
    pub(crate) preview_width: u16,
    pub(crate) bindings: KeyBindings,
    /// (done, total) of the running bulk operation
    pub(crate) bulk_progress: Option<(usize, usize)>,
    /// Generations waiting for an item's content to arrive
    pub(crate) pending_generation: HashSet<(GenerationKind, String)>,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    pub fn new(config: Config, collab: Collaborators) -> Self {
        let (dispatcher, events) = dispatch::channel();
        let bindings = KeyBindings::new(&config.ui.keybinding_mode);
        let cache = CacheLayer::new(config.ui.render_preference);

        Self {
            config,
            collab,
            dispatcher,
            events,
            store: ListStore::new(),
            search: SearchController::new(),
            bulk: BulkCoordinator::new(),
            cache,
            selected: None,
            status: StatusState::default(),
            input: InputMode::Normal,
            preview_mode: PreviewMode::Content,
            preview_width: DEFAULT_PREVIEW_WIDTH,
            bindings,
            bulk_progress: None,
            pending_generation: HashSet::new(),
            dirty: true,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        if let Ok((cols, _)) = crossterm::terminal::size() {
            self.resize(cols);
        }
        self.reload();

        let result = self.event_loop(&render_thread).await;

        render_thread.shutdown();
        tracing::info!("Shutting down");
        result
    }

    /// Apply every queued background result. Returns true if any were applied.
    pub fn process_events(&mut self) -> bool {
        let events = self.events.drain();
        let had_events = !events.is_empty();
        for event in events {
            self.handle_event(event);
        }
        if had_events {
            self.dirty = true;
        }
        had_events
    }

    /// Track the preview pane width for the current terminal width
    pub(crate) fn resize(&mut self, cols: u16) {
        let width = if cols >= MIN_SPLIT_VIEW_WIDTH {
            let ratio = u32::from(self.config.ui.clamped_split_ratio());
            u16::try_from(u32::from(cols) * (100 - ratio) / 100).unwrap_or(u16::MAX)
        } else {
            cols
        };
        self.preview_width = width.saturating_sub(2).max(1);
    }

    pub(crate) fn selected_item_id(&self) -> Option<String> {
        self.selected
            .and_then(|pos| self.store.get(pos))
            .map(|item| item.id.clone())
    }

    /// Render the selected item's content into the cache if needed
    pub(crate) fn prepare_preview(&mut self) {
        let Some(id) = self.selected_item_id() else {
            return;
        };
        let width = self.preview_width;
        if self.cache.rendered(&id, width).is_some() {
            return;
        }
        let (Some(item), Some(content)) = (self.store.item(&id), self.cache.content(&id)) else {
            return;
        };
        let preference = self.cache.preference(&id);
        let text = self.collab.renderer.render(item, content, width, preference);
        self.cache.store_rendered(&id, width, text);
    }

    /// Owned snapshot for the render thread
    pub fn view_state(&self) -> ViewState {
        let date_format = &self.config.ui.date_format;
        let rows = self
            .store
            .items()
            .iter()
            .map(|item| RowView {
                from: item.from.clone(),
                subject: item.subject.clone(),
                snippet: item.snippet.clone(),
                date: item.display_date(date_format),
                labels: item.labels.clone(),
                unread: item.is_unread(),
                starred: item.is_starred(),
                important: item.flags.contains(crate::mail::ItemFlags::IMPORTANT),
                marked: self.bulk.is_selected(&item.id),
            })
            .collect();

        let mut status = self.status.clone();
        status.loading = self.search.is_loading()
            || self.bulk.is_running()
            || self.cache.has_in_flight();
        if let Some((done, total)) = self.bulk_progress {
            status.message = format!("{} ({}/{})", status.message, done, total);
        }

        ViewState {
            rows,
            selected: self.selected,
            preview: self.preview_view(),
            loading: status.loading,
            status,
            mode_label: self.search.describe(),
            more_available: !self.search.cursor().is_end(),
            marked: self.bulk.len(),
            bulk_running: self.bulk.is_running(),
            input: self.input.clone(),
            help: if self.input.is_help() {
                self.bindings.all_bindings()
            } else {
                Vec::new()
            },
            split_ratio: self.config.ui.clamped_split_ratio(),
        }
    }

    fn preview_view(&self) -> Option<PreviewView> {
        let id = self.selected_item_id()?;
        let item = self.store.item(&id)?;

        let suggestions = self
            .cache
            .labels(&id)
            .filter(|labels| !labels.is_empty())
            .map(|labels| format!("Suggested labels: {}", labels.join(", ")));

        let view = match self.preview_mode {
            PreviewMode::Content => PreviewView {
                title: item.subject.clone(),
                body: self
                    .cache
                    .rendered(&id, self.preview_width)
                    .map(str::to_string),
                loading: self.cache.is_in_flight(InFlight::Content, &id),
                note: Some(match suggestions {
                    Some(s) => format!("{} view | {}", self.cache.preference(&id).label(), s),
                    None => format!("{} view", self.cache.preference(&id).label()),
                }),
            },
            PreviewMode::Summary => PreviewView {
                title: format!("Summary: {}", item.subject),
                body: self.cache.summary(&id).map(str::to_string),
                loading: self.cache.is_in_flight(InFlight::Summary, &id)
                    || self.cache.is_in_flight(InFlight::Content, &id),
                note: suggestions,
            },
        };
        Some(view)
    }

    /// Drive background work until nothing is queued or running
    #[cfg(test)]
    pub(crate) async fn run_until_idle(&mut self) {
        loop {
            self.process_events();
            if self.events.is_idle() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
    }
}
