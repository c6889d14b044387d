//! Search widget
//!
//! Composes the coordinator, debouncer, visibility state and lookup worker behind
//! the operations a host calls. The host loop calls `tick` regularly: it fires the
//! debounced search once its quiet period has passed and drains worker responses.
//!
//! Teardown (explicit or on drop) cancels the pending search, detaches the
//! outside-click listener, clears the cache and stops the worker.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use ratatui::layout::Rect;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::ResultSet;
use crate::config::SearchConfig;
use crate::coordinator::{Completion, Fetch, FetchCoordinator};
use crate::debouncer::SearchDebouncer;
use crate::dispatch::ActionDispatcher;
use crate::error::SearchError;
use crate::lookup::Lookup;
use crate::visibility::{ClickRegistry, ClickSubscription, VisibilityState};
use crate::worker::{self, LookupResponse};

pub struct SearchWidget {
    config: SearchConfig,
    coordinator: FetchCoordinator,
    debouncer: SearchDebouncer,
    visibility: VisibilityState,
    dispatcher: ActionDispatcher,
    /// Result set currently displayed (not the cache)
    results: ResultSet,
    /// Request started by the search path, whose results get displayed
    search_request_id: Option<u64>,
    response_rx: Receiver<LookupResponse>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
    subscription: Option<ClickSubscription>,
    clock: Instant,
    torn_down: bool,
}

impl SearchWidget {
    /// Build a widget and start its lookup worker
    pub fn new(
        config: SearchConfig,
        lookup: Lookup,
        dispatcher: ActionDispatcher,
    ) -> Result<Self, SearchError> {
        let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();

        let worker = worker::spawn_worker(lookup, request_rx, response_tx, shutdown.clone())?;

        let mut coordinator = FetchCoordinator::new(config.min_query_length);
        coordinator.set_channel(request_tx);

        log::debug!(
            "Search widget created (min_query_length={}, debounce_rate={}ms)",
            config.min_query_length,
            config.debounce_rate
        );

        Ok(Self {
            debouncer: SearchDebouncer::new(config.debounce_rate),
            config,
            coordinator,
            visibility: VisibilityState::new(),
            dispatcher,
            results: Vec::new(),
            search_request_id: None,
            response_rx,
            shutdown,
            worker: Some(worker),
            subscription: None,
            clock: Instant::now(),
            torn_down: false,
        })
    }

    /// Milliseconds since the widget was created
    pub fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Attach to the host. Registers for outside clicks when enabled; a second
    /// mount without an unmount keeps the existing registration.
    pub fn mount(&mut self, registry: &ClickRegistry) {
        if self.torn_down || !self.config.clear_on_outside_click {
            return;
        }
        if self.subscription.is_some() {
            log::debug!("Widget already mounted, keeping existing click listener");
            return;
        }
        self.subscription = Some(self.visibility.observe(registry));
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Release everything the widget holds. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.debouncer.cancel();
        self.subscription = None;
        self.remove_all_from_cache();
        self.coordinator.disconnect();
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::error!("Lookup worker panicked during teardown");
        }
        log::debug!("Search widget torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // ---------------------------------------------------------------------
    // Search path
    // ---------------------------------------------------------------------

    /// Trigger entry for a raw host input event
    pub fn handle_search_event(&mut self, event: &Event, query: &str) {
        log::trace!("Search event {:?}", event);
        self.search(query);
    }

    /// Schedule a debounced search for `query`
    pub fn search(&mut self, query: &str) {
        let now = self.now_ms();
        self.search_at(query, now);
    }

    pub fn search_at(&mut self, query: &str, now_ms: u64) {
        if self.torn_down {
            return;
        }
        self.debouncer.schedule_at(query, now_ms);
        // A zero quiet period dispatches right away through the same path
        self.run_due_search(now_ms);
    }

    /// Fire a due search and apply finished lookups
    pub fn tick(&mut self) -> Vec<Completion> {
        let now = self.now_ms();
        self.tick_at(now)
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Completion> {
        if self.torn_down {
            return Vec::new();
        }
        self.run_due_search(now_ms);
        self.poll()
    }

    fn run_due_search(&mut self, now_ms: u64) {
        let Some(query) = self.debouncer.take_ready_at(now_ms) else {
            return;
        };

        match self.fetch(&query) {
            Ok(Fetch::Ready(results)) => {
                self.search_request_id = None;
                self.set_results(results);
            }
            Ok(Fetch::Pending { request_id }) => {
                self.search_request_id = Some(request_id);
            }
            Err(e) => {
                // A running lookup for an earlier query must not repopulate the list
                self.search_request_id = None;
                log::debug!("Search for {:?} rejected: {}", query, e);
            }
        }
    }

    fn set_results(&mut self, results: ResultSet) {
        self.dispatcher.results_changed(&results);
        self.results = results;
    }

    // ---------------------------------------------------------------------
    // Coordinator operations
    // ---------------------------------------------------------------------

    /// Resolve a query from cache or start a remote lookup
    pub fn fetch(&mut self, query: &str) -> Result<Fetch, SearchError> {
        if self.torn_down && self.coordinator.is_eligible(query) {
            return Err(SearchError::WorkerUnavailable);
        }
        self.coordinator.fetch(query, &mut self.dispatcher)
    }

    /// Drain worker responses without blocking
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        loop {
            match self.response_rx.try_recv() {
                Ok(response) => completions.push(self.apply(response)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        completions
    }

    /// Block until one worker response arrives or the timeout passes
    pub fn wait_for_response(&mut self, timeout: Duration) -> Option<Completion> {
        match self.response_rx.recv_timeout(timeout) {
            Ok(response) => Some(self.apply(response)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Block until the latest lookup has completed, or the timeout passes
    pub fn block_until_idle(&mut self, timeout: Duration) -> Vec<Completion> {
        let deadline = Instant::now() + timeout;
        let mut completions = Vec::new();
        while self.coordinator.has_in_flight_request() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                log::warn!("Timed out waiting for lookup to finish");
                break;
            }
            match self.wait_for_response(remaining) {
                Some(completion) => completions.push(completion),
                None => break,
            }
        }
        completions
    }

    fn apply(&mut self, response: LookupResponse) -> Completion {
        let completion = self.coordinator.complete(response, &mut self.dispatcher);
        if let Completion::Applied {
            request_id,
            results,
            ..
        } = &completion
            && self.search_request_id == Some(*request_id)
        {
            self.search_request_id = None;
            self.set_results(results.clone());
        }
        completion
    }

    /// Empty the displayed result set; the cache is untouched
    pub fn clear_results(&mut self) {
        self.search_request_id = None;
        self.results.clear();
        self.dispatcher.results_changed(&self.results);
    }

    pub fn remove_from_cache(&mut self, query: &str) {
        self.coordinator.remove_from_cache(query);
    }

    pub fn remove_all_from_cache(&mut self) {
        self.coordinator.remove_all_from_cache();
    }

    // ---------------------------------------------------------------------
    // Visibility / selection
    // ---------------------------------------------------------------------

    /// Primary interaction with the widget
    pub fn activate(&mut self) {
        self.visibility.activate();
    }

    /// Forward a chosen result to the host
    pub fn select_result(&mut self, item: &Value) {
        self.dispatcher.result_selected(item);
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.visibility.set_bounds(bounds);
    }

    pub fn bounds(&self) -> Rect {
        self.visibility.bounds()
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.visibility.contains(column, row)
    }

    // ---------------------------------------------------------------------
    // State accessors
    // ---------------------------------------------------------------------

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.has_pending()
    }

    pub fn cached(&self, query: &str) -> Option<&ResultSet> {
        self.coordinator.cached(query)
    }
}

impl Drop for SearchWidget {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "widget_tests.rs"]
mod widget_tests;
