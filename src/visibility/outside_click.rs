//! Outside-click observer registry
//!
//! One registry per host event loop. Every mounted widget that wants outside-click
//! dismissal holds a `ClickSubscription`; the host forwards each click to
//! `dispatch_click`, which closes the panel of every listener the click missed.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ratatui::layout::Rect;

use super::contains;

struct Listener {
    id: u64,
    bounds: Rc<Cell<Rect>>,
    visible: Rc<Cell<bool>>,
}

type Listeners = RefCell<Vec<Listener>>;

#[derive(Default)]
pub struct ClickRegistry {
    listeners: Rc<Listeners>,
    next_id: Cell<u64>,
}

impl ClickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn subscribe(
        &self,
        bounds: Rc<Cell<Rect>>,
        visible: Rc<Cell<bool>>,
    ) -> ClickSubscription {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        self.listeners.borrow_mut().push(Listener {
            id,
            bounds,
            visible,
        });
        log::debug!("Outside-click listener {} attached", id);

        ClickSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Deliver a click at the given cell. Returns how many listeners it dismissed.
    pub fn dispatch_click(&self, column: u16, row: u16) -> usize {
        let listeners = self.listeners.borrow();
        let mut dismissed = 0;
        for listener in listeners.iter() {
            if !contains(listener.bounds.get(), column, row) && listener.visible.get() {
                listener.visible.set(false);
                dismissed += 1;
            }
        }
        dismissed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Attachment of one widget to a `ClickRegistry`; detaches on drop
#[must_use = "dropping the subscription detaches the listener"]
pub struct ClickSubscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl ClickSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for ClickSubscription {
    fn drop(&mut self) {
        // Registry may already be gone during host shutdown
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        listeners.borrow_mut().retain(|l| l.id != self.id);
        log::debug!("Outside-click listener {} detached", self.id);
    }
}
