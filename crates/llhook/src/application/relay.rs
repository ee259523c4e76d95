//! Callback relay plumbing: trampoline slots and [`dispatch`].
//!
//! # Why slots?
//!
//! A hook procedure receives `(nCode, wParam, lParam)` and nothing else:
//! there is no user-data pointer to find the controller that owns the hook.
//! The OS adapter therefore exposes [`MAX_HOOK_SLOTS`] distinct trampolines,
//! one per slot index.  Installing a controller claims a free slot on the
//! calling thread and registers that slot's trampoline; the trampoline calls
//! [`dispatch`] with its own index, which finds the controller again.
//!
//! The table is thread-local because low-level hooks are always called on
//! the thread that installed them.  A slot is looked up and the borrow
//! released before any subscriber code runs, so subscribers are free to
//! install or uninstall hooks, including their own.

use std::cell::RefCell;
use std::rc::Rc;

use llhook_core::{LParam, LResult, RawEventRecord, WParam};

/// Number of trampolines, and so of hooks one thread can hold at once.
pub const MAX_HOOK_SLOTS: usize = 16;

/// Type-erased relay body of an installed controller.
pub(crate) trait Relay {
    fn relay(&self, raw: RawEventRecord) -> LResult;
}

type SlotTable = [Option<Rc<dyn Relay>>; MAX_HOOK_SLOTS];

thread_local! {
    static SLOTS: RefCell<SlotTable> = RefCell::new(Default::default());
}

/// Stores `relay` in the lowest free slot and returns its index.
pub(crate) fn claim_slot(relay: Rc<dyn Relay>) -> Option<usize> {
    SLOTS.with(|slots| {
        let mut slots = slots.borrow_mut();
        let index = slots.iter().position(Option::is_none)?;
        slots[index] = Some(relay);
        Some(index)
    })
}

/// Frees `index`.  The relay stays alive while a dispatch still holds it.
pub(crate) fn release_slot(index: usize) {
    // Dropped outside the borrow: the relay's destructor may touch the table.
    let released = SLOTS.with(|slots| {
        slots
            .borrow_mut()
            .get_mut(index)
            .and_then(Option::take)
    });
    drop(released);
}

/// Number of occupied slots on the calling thread.
pub fn occupied_slots() -> usize {
    SLOTS.with(|slots| slots.borrow().iter().filter(|s| s.is_some()).count())
}

/// Runs the Callback Relay for the controller registered in `slot`.
///
/// Returns `None` if the slot is empty on this thread; the caller should
/// then forward with the null anchor.
///
/// # Safety
///
/// `lparam` must be null or point to the native record the OS delivers for
/// the chain of the hook installed in `slot`, valid for the whole call.
/// OS trampolines satisfy this by passing their arguments through unchanged.
pub unsafe fn dispatch(slot: usize, code: i32, wparam: WParam, lparam: LParam) -> Option<LResult> {
    let relay = SLOTS.with(|slots| slots.borrow().get(slot).cloned().flatten())?;
    Some(relay.relay(RawEventRecord::new(code, wparam, lparam)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
