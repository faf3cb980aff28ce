use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use hondana_catalog::{
    CatalogSource, OrderBy, SearchPage, SearchParams, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};
use hondana_types::Book;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::identity::Generation;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub books: Vec<Book>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
    pub total_items: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub page_size: u32,
    pub order_by: Option<OrderBy>,
    pub lang_restrict: Option<String>,
    pub country: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            page_size: DEFAULT_MAX_RESULTS,
            order_by: None,
            lang_restrict: None,
            country: None,
        }
    }
}

impl SearchOptions {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_RESULTS_LIMIT);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn lang_restrict(mut self, lang: impl Into<String>) -> Self {
        self.lang_restrict = Some(lang.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

// Request slot holds ticket of its owner, 0 when free.
// Released on drop, so cancelled fetch does not block the session,
// but only if the slot was not handed over by `reset` meanwhile.
struct InFlight<'a> {
    slot: &'a AtomicU64,
    ticket: u64,
}

impl<'a> InFlight<'a> {
    fn acquire(slot: &'a AtomicU64, tickets: &AtomicU64) -> Option<Self> {
        let ticket = tickets.fetch_add(1, Ordering::AcqRel) + 1;
        slot.compare_exchange(0, ticket, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { slot, ticket })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let _ = self.slot.compare_exchange(
            self.ticket,
            0,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// Paged catalog search, results of subsequent pages are accumulated.
///
/// At most one catalog request runs at a time, calls made meanwhile are ignored.
/// [`SearchSession::reset`] and blank search free the session at once, result of a request
/// still running is then discarded.
pub struct SearchSession<C> {
    catalog: C,
    options: SearchOptions,
    state: watch::Sender<SearchState>,
    cursor: AtomicU32,
    in_flight: AtomicU64,
    tickets: AtomicU64,
    generation: Generation,
}

impl<C: CatalogSource> SearchSession<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_options(catalog, SearchOptions::default())
    }

    pub fn with_options(catalog: C, options: SearchOptions) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        SearchSession {
            catalog,
            options,
            state,
            cursor: AtomicU32::new(0),
            in_flight: AtomicU64::new(0),
            tickets: AtomicU64::new(0),
            generation: Generation::default(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    fn params(&self, query: &str, start_index: u32) -> SearchParams {
        SearchParams {
            query: query.to_string(),
            start_index,
            max_results: self.options.page_size,
            order_by: self.options.order_by,
            lang_restrict: self.options.lang_restrict.clone(),
            country: self.options.country.clone(),
            print_type: None,
        }
    }

    /// Starts new search from the first page, blank query just clears results
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.generation.next();
            self.in_flight.store(0, Ordering::Release);
            self.cursor.store(0, Ordering::Release);
            self.state.send_modify(|s| {
                s.books.clear();
                s.error = None;
                s.has_more = false;
                s.total_items = 0;
                s.is_loading = false;
            });
            return;
        }

        let Some(_guard) = InFlight::acquire(&self.in_flight, &self.tickets) else {
            debug!("Search for {query} ignored, other request in progress");
            return;
        };
        let generation = self.generation.next();
        self.cursor.store(0, Ordering::Release);
        self.state.send_modify(|s| {
            s.query = query.to_string();
            s.books.clear();
            s.has_more = false;
            s.total_items = 0;
            s.error = None;
            s.is_loading = true;
        });

        let result = self.catalog.search(&self.params(query, 0)).await;
        if !self.generation.is_current(generation) {
            return;
        }
        match result {
            Ok(page) => {
                self.cursor
                    .store(page.books.len() as u32, Ordering::Release);
                self.state.send_modify(|s| {
                    s.books = page.books;
                    s.has_more = page.has_more && !s.books.is_empty();
                    s.total_items = page.total_items;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!("Search for {query} failed: {e}");
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.is_loading = false;
                });
            }
        }
    }

    /// Appends next page, no-op when there is nothing more or request is in flight
    pub async fn load_more(&self) {
        if !self.state.borrow().has_more {
            return;
        }
        let Some(_guard) = InFlight::acquire(&self.in_flight, &self.tickets) else {
            debug!("Load more ignored, other request in progress");
            return;
        };
        let generation = self.generation.current();
        let query = self.state.borrow().query.clone();
        let start_index = self.cursor.load(Ordering::Acquire);
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.catalog.search(&self.params(&query, start_index)).await;
        if !self.generation.is_current(generation) {
            return;
        }
        match result {
            Ok(page) => self.append(page),
            Err(e) => {
                warn!("Loading more results for {query} failed: {e}");
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.is_loading = false;
                });
            }
        }
    }

    fn append(&self, page: SearchPage) {
        let received = page.books.len() as u32;
        self.cursor.fetch_add(received, Ordering::AcqRel);
        self.state.send_modify(|s| {
            s.books.extend(page.books);
            // empty page would otherwise keep us asking forever
            s.has_more = page.has_more && received > 0;
            s.total_items = page.total_items;
            s.is_loading = false;
        });
    }

    pub fn reset(&self) {
        self.generation.next();
        self.in_flight.store(0, Ordering::Release);
        self.cursor.store(0, Ordering::Release);
        self.state.send_replace(SearchState::default());
    }
}
