//! Fetch coordinator
//!
//! Resolves a query from the result cache or hands it to the lookup worker, and
//! owns the loading flag around both paths. Every eligible fetch takes a new
//! request id; only the completion of the most recent fetch may touch the cache
//! or clear the loading flag.

use tokio::sync::mpsc::UnboundedSender;

use crate::ResultSet;
use crate::cache::ResultCache;
use crate::dispatch::ActionDispatcher;
use crate::error::SearchError;
use crate::lookup::LookupError;
use crate::worker::{LookupRequest, LookupResponse};

/// Immediate outcome of `fetch`
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    /// Cache hit, resolved synchronously
    Ready(ResultSet),
    /// Sent to the lookup worker; resolves through `complete`
    Pending { request_id: u64 },
}

/// What a worker response did once it reached the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Latest request succeeded; results are now cached
    Applied {
        request_id: u64,
        query: String,
        results: ResultSet,
    },
    /// Latest request failed; cache untouched
    Failed {
        request_id: u64,
        query: String,
        error: LookupError,
    },
    /// A newer fetch superseded this request; its outcome was discarded
    Stale { request_id: u64, query: String },
}

#[derive(Debug)]
pub struct FetchCoordinator {
    cache: ResultCache,
    min_query_length: usize,
    loading: bool,
    /// Next ID to hand out (0 is never used)
    next_request_id: u64,
    /// ID of the remote lookup whose outcome will be applied, if one is running
    in_flight_request_id: Option<u64>,
    request_tx: Option<UnboundedSender<LookupRequest>>,
}

impl FetchCoordinator {
    pub fn new(min_query_length: usize) -> Self {
        Self {
            cache: ResultCache::new(),
            min_query_length,
            loading: false,
            next_request_id: 1,
            in_flight_request_id: None,
            request_tx: None,
        }
    }

    /// Connect the coordinator to a lookup worker
    pub fn set_channel(&mut self, request_tx: UnboundedSender<LookupRequest>) {
        self.request_tx = Some(request_tx);
    }

    /// Disconnect from the worker; later cache misses fail with `WorkerUnavailable`
    pub fn disconnect(&mut self) {
        self.request_tx = None;
    }

    /// Blank queries and queries shorter than the minimum never reach the cache or network
    pub fn is_eligible(&self, query: &str) -> bool {
        !query.trim().is_empty() && query.chars().count() >= self.min_query_length
    }

    pub fn fetch(
        &mut self,
        query: &str,
        dispatcher: &mut ActionDispatcher,
    ) -> Result<Fetch, SearchError> {
        if !self.is_eligible(query) {
            return Err(SearchError::QueryTooShort {
                query: query.to_string(),
                min: self.min_query_length,
            });
        }

        let request_id = self.next_id();
        // Anything still running belongs to an older fetch from here on
        self.in_flight_request_id = None;

        // Loading is signalled even for hits so the host sees a uniform searching pulse
        self.set_loading(true, dispatcher);

        if let Some(cached) = self.cache.get(query) {
            let results = cached.clone();
            log::debug!("Cache hit for {:?} (request {})", query, request_id);
            self.set_loading(false, dispatcher);
            return Ok(Fetch::Ready(results));
        }

        let sent = self.request_tx.as_ref().is_some_and(|tx| {
            tx.send(LookupRequest {
                query: query.to_string(),
                request_id,
            })
            .is_ok()
        });

        if !sent {
            log::warn!("Lookup worker unavailable, dropping request {}", request_id);
            self.set_loading(false, dispatcher);
            return Err(SearchError::WorkerUnavailable);
        }

        log::debug!("Cache miss for {:?}, sent request {}", query, request_id);
        self.in_flight_request_id = Some(request_id);
        Ok(Fetch::Pending { request_id })
    }

    /// Apply a worker response. Loading is cleared whatever the outcome, unless a
    /// newer fetch owns the flag.
    pub fn complete(
        &mut self,
        response: LookupResponse,
        dispatcher: &mut ActionDispatcher,
    ) -> Completion {
        let LookupResponse {
            query,
            request_id,
            outcome,
        } = response;

        if self.in_flight_request_id != Some(request_id) {
            log::debug!(
                "Ignoring stale response {} (current: {:?})",
                request_id,
                self.in_flight_request_id
            );
            return Completion::Stale { request_id, query };
        }

        self.in_flight_request_id = None;

        let completion = match outcome {
            Ok(results) => {
                self.cache.put(query.clone(), results.clone());
                Completion::Applied {
                    request_id,
                    query,
                    results,
                }
            }
            Err(error) => {
                log::warn!("Lookup for {:?} failed: {}", query, error);
                Completion::Failed {
                    request_id,
                    query,
                    error,
                }
            }
        };

        self.set_loading(false, dispatcher);
        completion
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        if self.next_request_id == 0 {
            self.next_request_id = 1;
        }
        id
    }

    fn set_loading(&mut self, loading: bool, dispatcher: &mut ActionDispatcher) {
        self.loading = loading;
        dispatcher.loading_changed(loading);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_in_flight_request(&self) -> bool {
        self.in_flight_request_id.is_some()
    }

    pub fn in_flight_request_id(&self) -> Option<u64> {
        self.in_flight_request_id
    }

    pub fn min_query_length(&self) -> usize {
        self.min_query_length
    }

    pub fn cached(&self, query: &str) -> Option<&ResultSet> {
        self.cache.get(query)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn remove_from_cache(&mut self, query: &str) {
        self.cache.remove(query);
    }

    pub fn remove_all_from_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod coordinator_tests;
