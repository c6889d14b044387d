//! Search debouncer
//!
//! Coalesces rapid search triggers into one dispatch carrying the latest query,
//! fired once `delay_ms` has passed without a new trigger. Time is passed in as
//! milliseconds so the widget's clock (or a test) drives it.

/// Trailing-edge debouncer holding at most one pending query
#[derive(Debug)]
pub struct SearchDebouncer {
    /// Quiet period in milliseconds
    delay_ms: u64,
    /// Query waiting for the quiet period to elapse
    pending_query: Option<String>,
    /// Time of the trigger that scheduled the pending query
    last_input_ms: Option<u64>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SearchDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending_query: None,
            last_input_ms: None,
        }
    }

    /// Schedule a dispatch of `query`, replacing any pending one and restarting the timer
    pub fn schedule_at(&mut self, query: impl Into<String>, now_ms: u64) {
        self.pending_query = Some(query.into());
        self.last_input_ms = Some(now_ms);
    }

    pub fn is_ready_at(&self, now_ms: u64) -> bool {
        match (self.pending_query.as_ref(), self.last_input_ms) {
            (Some(_), Some(last)) => now_ms.saturating_sub(last) >= self.delay_ms,
            _ => false,
        }
    }

    /// Take the pending query if its quiet period has elapsed
    pub fn take_ready_at(&mut self, now_ms: u64) -> Option<String> {
        if !self.is_ready_at(now_ms) {
            return None;
        }
        self.last_input_ms = None;
        self.pending_query.take()
    }

    /// Drop the pending query without dispatching it
    pub fn cancel(&mut self) {
        if let Some(query) = self.pending_query.take() {
            log::debug!("Cancelled pending search for {:?}", query);
        }
        self.last_input_ms = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending_query.is_some()
    }

    pub fn pending_query(&self) -> Option<&str> {
        self.pending_query.as_deref()
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
