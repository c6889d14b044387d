//! Results panel visibility
//!
//! Activation opens the panel; a click outside the widget's bounds closes it when
//! the host enabled outside-click dismissal. The flag and bounds are shared cells so
//! the click registry can update them synchronously while dispatching a click.

mod outside_click;

pub use outside_click::{ClickRegistry, ClickSubscription};

use std::cell::Cell;
use std::rc::Rc;

use ratatui::layout::Rect;

/// Check if a point is within a rectangle
pub(crate) fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[derive(Debug, Default)]
pub struct VisibilityState {
    visible: Rc<Cell<bool>>,
    bounds: Rc<Cell<Rect>>,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Primary interaction with the widget opens the results panel
    pub fn activate(&self) {
        self.visible.set(true);
    }

    pub fn dismiss(&self) {
        self.visible.set(false);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Record where the host drew the widget
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        contains(self.bounds.get(), column, row)
    }

    /// Register for outside clicks. Dropping the subscription detaches it.
    pub fn observe(&self, registry: &ClickRegistry) -> ClickSubscription {
        registry.subscribe(self.bounds.clone(), self.visible.clone())
    }
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod visibility_tests;
