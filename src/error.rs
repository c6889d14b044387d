use thiserror::Error;

use crate::lookup::LookupError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Query too short: {query:?} (minimum length is {min})")]
    QueryTooShort { query: String, min: usize },

    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Lookup worker is not running")]
    WorkerUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// True for the fail-fast rejection of blank or short queries
    pub fn is_query_too_short(&self) -> bool {
        matches!(self, SearchError::QueryTooShort { .. })
    }
}
