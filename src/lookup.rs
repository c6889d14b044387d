//! Remote lookup abstraction
//!
//! Defines the `Lookup` enum, `LookupError` types, and the `RemoteLookup` trait hosts
//! implement to replace the default HTTP lookup entirely.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::ResultSet;
use crate::config::SearchConfig;

mod http;

pub use http::HttpLookup;

/// Errors that can occur while resolving a query remotely
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LookupError {
    /// No usable endpoint configured for the default lookup
    #[error("Lookup not configured: {message}")]
    NotConfigured { message: String },

    /// Network error during the request
    #[error("Network error: {message}")]
    Network { message: String },

    /// Endpoint answered with a non-success status
    #[error("Endpoint error ({code}): {message}")]
    Api { code: u16, message: String },

    /// Response body was not a usable result set
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The lookup task died before producing an outcome
    #[error("Lookup task failed: {message}")]
    Task { message: String },

    /// Failure reported by a host-supplied lookup
    #[error("{0}")]
    Other(String),
}

/// Host-supplied asynchronous lookup
///
/// Any `Fn(String) -> impl Future<Output = Result<ResultSet, LookupError>>` closure
/// implements this trait, so hosts rarely need a named type.
pub trait RemoteLookup: Send + Sync {
    fn lookup(&self, query: String) -> BoxFuture<'static, Result<ResultSet, LookupError>>;
}

impl<F, Fut> RemoteLookup for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResultSet, LookupError>> + Send + 'static,
{
    fn lookup(&self, query: String) -> BoxFuture<'static, Result<ResultSet, LookupError>> {
        Box::pin(self(query))
    }
}

/// Lookup strategies, selected when the widget is built
#[derive(Clone)]
pub enum Lookup {
    /// GET `endpoint?q=<query>` returning a JSON array
    Http(HttpLookup),
    /// Host override
    Custom(Arc<dyn RemoteLookup>),
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Http(http) => f.debug_tuple("Http").field(&http.endpoint()).finish(),
            Lookup::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Lookup {
    /// Build the default HTTP lookup from configuration
    ///
    /// Returns an error if no endpoint is configured or it is not a valid URL.
    pub fn from_config(config: &SearchConfig) -> Result<Self, LookupError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| LookupError::NotConfigured {
                message: "Missing endpoint. Set 'endpoint' in the config file or pass --endpoint."
                    .to_string(),
            })?;

        let timeout = Duration::from_millis(config.request_timeout_ms);
        Ok(Lookup::Http(HttpLookup::new(endpoint, timeout)?))
    }

    /// Wrap a host lookup
    pub fn custom(lookup: impl RemoteLookup + 'static) -> Self {
        Lookup::Custom(Arc::new(lookup))
    }

    /// Returns the display name of the strategy
    pub fn name(&self) -> &'static str {
        match self {
            Lookup::Http(_) => "http",
            Lookup::Custom(_) => "custom",
        }
    }

    /// Resolve a query. The returned future owns everything it needs, so it can be
    /// spawned onto the worker runtime.
    pub fn lookup(&self, query: String) -> BoxFuture<'static, Result<ResultSet, LookupError>> {
        match self {
            Lookup::Http(http) => {
                let http = http.clone();
                Box::pin(async move { http.lookup(&query).await })
            }
            Lookup::Custom(custom) => custom.lookup(query),
        }
    }
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod lookup_tests;
