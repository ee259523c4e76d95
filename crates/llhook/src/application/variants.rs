//! Specialized hook variants.
//!
//! | alias            | chain                  | typed notification       |
//! |------------------|------------------------|--------------------------|
//! | [`KeyboardHook`] | `WH_KEYBOARD_LL`       | [`KeyboardEvent`]        |
//! | [`MouseHook`]    | `WH_MOUSE_LL`          | [`MouseEvent`]           |
//! | [`GenericHook`]  | any [`HookKind`]       | none (generic only)      |

use llhook_core::{HookKind, KeyboardEvent, MouseEvent, RawEventRecord};

use crate::application::controller::{HookController, HookVariant, Policy};
use crate::application::hook_api::HookApi;
use crate::application::subscribers::{HandlerResult, Subscribers};

pub type KeyboardHook<A> = HookController<KeyboardVariant, A>;
pub type MouseHook<A> = HookController<MouseVariant, A>;
pub type GenericHook<A> = HookController<GenericVariant, A>;

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Publishes a [`KeyboardEvent`] for every actionable keyboard event.
#[derive(Default)]
pub struct KeyboardVariant {
    subscribers: Subscribers<KeyboardEvent>,
}

impl KeyboardVariant {
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl HookVariant for KeyboardVariant {
    fn kind(&self) -> HookKind {
        HookKind::KeyboardLowLevel
    }

    unsafe fn notify(&self, raw: &RawEventRecord, policy: &Policy) -> HandlerResult {
        match KeyboardEvent::from_raw(raw) {
            Some(event) => self.subscribers.notify(&event, policy),
            None => Ok(()),
        }
    }
}

impl<A: HookApi + 'static> HookController<KeyboardVariant, A> {
    /// Creates an uninstalled low-level keyboard hook.
    pub fn keyboard(api: A) -> Self {
        Self::with_api(KeyboardVariant::default(), api)
    }

    /// Subscribes to decoded keyboard events.
    pub fn on_key<F>(&self, handler: F)
    where
        F: FnMut(&KeyboardEvent, &Policy) -> HandlerResult + 'static,
    {
        self.variant().subscribers.subscribe(handler);
    }
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

/// Publishes a [`MouseEvent`] for every actionable mouse event.
#[derive(Default)]
pub struct MouseVariant {
    subscribers: Subscribers<MouseEvent>,
}

impl MouseVariant {
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl HookVariant for MouseVariant {
    fn kind(&self) -> HookKind {
        HookKind::MouseLowLevel
    }

    unsafe fn notify(&self, raw: &RawEventRecord, policy: &Policy) -> HandlerResult {
        match MouseEvent::from_raw(raw) {
            Some(event) => self.subscribers.notify(&event, policy),
            None => Ok(()),
        }
    }
}

impl<A: HookApi + 'static> HookController<MouseVariant, A> {
    /// Creates an uninstalled low-level mouse hook.
    pub fn mouse(api: A) -> Self {
        Self::with_api(MouseVariant::default(), api)
    }

    /// Subscribes to decoded mouse events.
    pub fn on_mouse<F>(&self, handler: F)
    where
        F: FnMut(&MouseEvent, &Policy) -> HandlerResult + 'static,
    {
        self.variant().subscribers.subscribe(handler);
    }
}

// ── Generic ───────────────────────────────────────────────────────────────────

/// Joins any chain and only publishes the generic notification.
///
/// Legacy chains deliver records this crate does not decode, so subscribers
/// get the raw triplet through `on_processing` and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct GenericVariant {
    kind: HookKind,
}

impl GenericVariant {
    pub fn new(kind: HookKind) -> Self {
        Self { kind }
    }
}

impl HookVariant for GenericVariant {
    fn kind(&self) -> HookKind {
        self.kind
    }

    unsafe fn notify(&self, _raw: &RawEventRecord, _policy: &Policy) -> HandlerResult {
        Ok(())
    }
}

impl<A: HookApi + 'static> HookController<GenericVariant, A> {
    /// Creates an uninstalled hook for `kind`.
    pub fn generic(kind: HookKind, api: A) -> Self {
        Self::with_api(GenericVariant::new(kind), api)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
