//! hyper-search library - embeddable search-input core
//!
//! Accepts typed queries, suppresses redundant lookups with a debouncer and a
//! result cache, resolves misses through a pluggable remote lookup, and reports
//! loading, results and selections back to the embedding host.

pub mod app;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod debouncer;
pub mod dispatch;
pub mod error;
pub mod lookup;
pub mod visibility;
pub mod widget;
pub mod worker;

/// Ordered result items as returned by a lookup; the core never looks inside them
pub type ResultSet = Vec<serde_json::Value>;

// Re-export commonly used types for convenience
pub use config::SearchConfig;
pub use coordinator::{Completion, Fetch};
pub use dispatch::{ActionDispatcher, HostCallbacks, SearchAction};
pub use error::SearchError;
pub use lookup::{Lookup, LookupError, RemoteLookup};
pub use visibility::ClickRegistry;
pub use widget::SearchWidget;
