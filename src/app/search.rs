//! Search mode state machine.
//!
//! `None` is the default listing, `Remote` a server-side search and `Local` a
//! client-side filter over whatever is already loaded. Entering `Local` parks
//! the current listing in a [`BaseSnapshot`] which is restored on exit.
//!
//! Every listing gets a generation number; page results carrying an older
//! generation are dropped so late responses cannot corrupt a newer listing.

use std::collections::HashSet;

use aho_corasick::AhoCorasick;

use super::store::ListStore;
use crate::error::{MailError, MailResult};
use crate::mail::{Cursor, Item, Mutation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    None,
    Remote,
    Local,
}

/// Everything a background task needs to fetch one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    /// Server-side query; `None` for the default listing
    pub query: Option<String>,
    pub cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMore {
    Request(PageRequest),
    /// Listing exhausted or paging not applicable
    NoMore,
    /// A page is already being fetched
    Busy,
}

/// Listing parked while a local filter is active
#[derive(Debug, Clone)]
struct BaseSnapshot {
    store: ListStore,
    cursor: Cursor,
    selected: Option<usize>,
    mode: SearchMode,
}

/// Outcome of applying a local filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFilter {
    pub visible: usize,
    pub loaded: usize,
    /// The parked listing still has pages on the server
    pub more_remote: bool,
}

impl LocalFilter {
    pub fn status(&self) -> String {
        if self.more_remote {
            format!(
                "Filtered {} of {} loaded; more on server",
                self.visible, self.loaded
            )
        } else {
            format!("Filtered {} of {}", self.visible, self.loaded)
        }
    }
}

/// Result of a finished page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDone {
    /// First page of a new listing
    pub first: bool,
    pub exhausted: bool,
}

#[derive(Debug, Default)]
pub struct SearchController {
    mode: SearchMode,
    query: String,
    filter: String,
    cursor: Cursor,
    generation: u64,
    loading: bool,
    halted: bool,
    first_page: bool,
    /// Old listing stays visible until the first chunk of a reload arrives
    awaiting_replace: bool,
    base: Option<BaseSnapshot>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Mode that paging applies to (the parked one while filtering)
    fn listing_mode(&self) -> SearchMode {
        match &self.base {
            Some(base) => base.mode,
            None => self.mode,
        }
    }

    fn start_listing(&mut self) -> PageRequest {
        self.generation += 1;
        self.cursor = Cursor::end();
        self.loading = true;
        self.halted = false;
        self.first_page = true;
        self.base = None;
        self.filter.clear();
        PageRequest {
            generation: self.generation,
            query: (self.mode == SearchMode::Remote).then(|| self.query.clone()),
            cursor: Cursor::end(),
        }
    }

    /// Start a server-side search, clearing the current listing
    pub fn begin_remote(&mut self, query: &str, store: &mut ListStore) -> MailResult<PageRequest> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MailError::invalid("search query is empty"));
        }
        store.clear();
        self.mode = SearchMode::Remote;
        self.query = query.to_string();
        self.awaiting_replace = false;
        tracing::debug!("Remote search for {:?}", self.query);
        Ok(self.start_listing())
    }

    /// Return to the default listing. The current items stay on screen until
    /// the fresh listing starts arriving.
    pub fn reset(&mut self) -> PageRequest {
        self.mode = SearchMode::None;
        self.query.clear();
        self.awaiting_replace = true;
        self.start_listing()
    }

    /// Request the next page of the active listing
    pub fn load_more(&mut self) -> LoadMore {
        if self.mode == SearchMode::Local {
            return LoadMore::NoMore;
        }
        if self.loading {
            return LoadMore::Busy;
        }
        if self.cursor.is_end() {
            return LoadMore::NoMore;
        }
        self.loading = true;
        self.halted = false;
        LoadMore::Request(PageRequest {
            generation: self.generation,
            query: (self.mode == SearchMode::Remote).then(|| self.query.clone()),
            cursor: self.cursor.clone(),
        })
    }

    /// Whether the list should fetch more when the selection nears the end
    pub fn wants_more(&self) -> bool {
        self.mode != SearchMode::Local && !self.loading && !self.halted && !self.cursor.is_end()
    }

    /// Add a chunk of page items. Returns false for stale generations.
    pub fn apply_items(&mut self, generation: u64, items: Vec<Item>, store: &mut ListStore) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping {} items from stale listing {} (current {})",
                items.len(),
                generation,
                self.generation
            );
            return false;
        }
        let target = match &mut self.base {
            Some(base) => &mut base.store,
            None => store,
        };
        if self.awaiting_replace {
            self.awaiting_replace = false;
            target.replace(items);
        } else {
            target.append(items);
        }
        true
    }

    /// Record the end of a page. `None` for stale generations.
    pub fn finish_page(
        &mut self,
        generation: u64,
        next_cursor: Cursor,
        store: &mut ListStore,
    ) -> Option<PageDone> {
        if generation != self.generation {
            return None;
        }
        if self.awaiting_replace {
            // Empty first page of a reload
            self.awaiting_replace = false;
            match &mut self.base {
                Some(base) => base.store.clear(),
                None => store.clear(),
            }
        }
        self.loading = false;
        let exhausted = next_cursor.is_end();
        if let Some(base) = &mut self.base {
            base.cursor = next_cursor.clone();
        }
        self.cursor = next_cursor;
        let first = std::mem::take(&mut self.first_page);
        Some(PageDone { first, exhausted })
    }

    /// Halt paging after a failed page. Items of this listing already added
    /// stay; items left over from the previous listing are cleared.
    pub fn fail_page(&mut self, generation: u64, store: &mut ListStore) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        self.halted = true;
        self.first_page = false;
        if std::mem::take(&mut self.awaiting_replace) {
            match &mut self.base {
                Some(base) => base.store.clear(),
                None => store.clear(),
            }
        }
        true
    }

    /// Filter the loaded items. The current listing is parked on first entry;
    /// re-filtering works from the parked listing.
    pub fn enter_local(
        &mut self,
        filter: &str,
        store: &mut ListStore,
        selected: Option<usize>,
    ) -> MailResult<LocalFilter> {
        let matcher = TokenMatcher::new(filter)?;

        if self.base.is_none() {
            self.base = Some(BaseSnapshot {
                store: store.clone(),
                cursor: self.cursor.clone(),
                selected,
                mode: self.mode,
            });
        }
        let Some(base) = &self.base else {
            return Err(MailError::invalid("no listing to filter"));
        };

        let matches: Vec<Item> = base
            .store
            .items()
            .iter()
            .filter(|item| matcher.matches(&item.row_text()))
            .cloned()
            .collect();

        let result = LocalFilter {
            visible: matches.len(),
            loaded: base.store.len(),
            more_remote: !base.cursor.is_end(),
        };
        store.replace(matches);
        self.mode = SearchMode::Local;
        self.filter = filter.trim().to_string();
        tracing::debug!("Local filter {:?}: {:?}", self.filter, result);
        Ok(result)
    }

    /// Leave the local filter and restore the parked listing.
    ///
    /// Returns the restored selection, or `None` when no filter was active.
    pub fn exit_local(&mut self, store: &mut ListStore) -> Option<Option<usize>> {
        let base = self.base.take()?;
        *store = base.store;
        self.cursor = base.cursor;
        self.mode = base.mode;
        self.filter.clear();
        let selected = base
            .selected
            .filter(|&pos| pos < store.len())
            .or_else(|| (!store.is_empty()).then_some(0));
        Some(selected)
    }

    /// Drop removed items from the parked listing
    pub fn forget(&mut self, ids: &HashSet<String>) {
        if let Some(base) = &mut self.base {
            base.selected = base.store.remove_ids(ids, base.selected);
        }
    }

    /// Mirror a successful mutation into the parked listing
    pub fn apply_mutation(&mut self, id: &str, mutation: &Mutation) {
        if let Some(base) = &mut self.base {
            base.store.apply_mutation(id, mutation);
        }
    }

    /// Mirror refreshed metadata into the parked listing
    pub fn refresh(&mut self, item: &Item) {
        if let Some(base) = &mut self.base {
            base.store.refresh(item.clone());
        }
    }

    /// Short description of the active mode for the status bar
    pub fn describe(&self) -> Option<String> {
        match self.mode {
            SearchMode::None => None,
            SearchMode::Remote => Some(format!("search: {}", self.query)),
            SearchMode::Local if self.listing_mode() == SearchMode::Remote => {
                Some(format!("search: {} | filter: {}", self.query, self.filter))
            }
            SearchMode::Local => Some(format!("filter: {}", self.filter)),
        }
    }
}

/// Case-insensitive AND match of whitespace separated tokens
struct TokenMatcher {
    automaton: AhoCorasick,
    tokens: usize,
}

impl TokenMatcher {
    fn new(filter: &str) -> MailResult<Self> {
        let lowered = filter.to_lowercase();
        let mut tokens: Vec<&str> = Vec::new();
        for token in lowered.split_whitespace() {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        if tokens.is_empty() {
            return Err(MailError::invalid("filter is empty"));
        }
        let automaton = AhoCorasick::new(&tokens)
            .map_err(|e| MailError::invalid(format!("bad filter: {}", e)))?;
        Ok(Self {
            automaton,
            tokens: tokens.len(),
        })
    }

    fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        let mut seen = HashSet::new();
        for m in self.automaton.find_overlapping_iter(&text) {
            seen.insert(m.pattern());
            if seen.len() == self.tokens {
                return true;
            }
        }
        false
    }
}
