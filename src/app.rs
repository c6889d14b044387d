//! Terminal reference host
//!
//! Embeds a `SearchWidget` in a ratatui screen: an input line feeding the
//! debounced search, a results list shown while the widget is active, and mouse
//! clicks routed through a `ClickRegistry` for outside-click dismissal.

mod app_events;
mod app_render;
mod app_state;

#[cfg(test)]
mod test_support;


#[cfg(test)]
mod app_render_tests;

pub use app_render::item_label;
pub use app_state::App;
