//! Subscriber lists for hook notifications.
//!
//! Subscribers run on the OS dispatch thread while the relay is inside a hook
//! procedure.  A subscriber may register further subscribers while it runs;
//! those are parked and join the list before the next event.

use std::cell::{Cell, RefCell};

use crate::application::controller::Policy;

/// Result type returned by every subscriber.
///
/// An `Err` makes the relay fall back to full passthrough for that event.
pub type HandlerResult = anyhow::Result<()>;

type Handler<E> = Box<dyn FnMut(&E, &Policy) -> HandlerResult>;

/// An ordered list of subscribers for events of type `E`.
pub struct Subscribers<E> {
    active: RefCell<Vec<Handler<E>>>,
    parked: RefCell<Vec<Handler<E>>>,
    count: Cell<usize>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            active: RefCell::new(Vec::new()),
            parked: RefCell::new(Vec::new()),
            count: Cell::new(0),
        }
    }

    /// Adds a subscriber.  Safe to call from inside a notification.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: FnMut(&E, &Policy) -> HandlerResult + 'static,
    {
        match self.active.try_borrow_mut() {
            Ok(mut active) => active.push(Box::new(handler)),
            Err(_) => self.parked.borrow_mut().push(Box::new(handler)),
        }
        self.count.set(self.count.get() + 1);
    }

    /// Number of registered subscribers, parked ones included.  Accurate
    /// from inside a notification too.
    pub fn len(&self) -> usize {
        self.count.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every subscriber in registration order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error, or an error if the list is already
    /// being notified further up the stack.
    pub fn notify(&self, event: &E, policy: &Policy) -> HandlerResult {
        let mut active = self
            .active
            .try_borrow_mut()
            .map_err(|_| anyhow::anyhow!("subscriber list is already being notified"))?;
        active.append(&mut self.parked.borrow_mut());
        for handler in active.iter_mut() {
            handler(event, policy)?;
        }
        Ok(())
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
