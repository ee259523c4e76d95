//! Hook Lifecycle Controller and the relay body.
//!
//! A [`HookController`] owns at most one OS hook.  It is built from two
//! parts:
//!
//! - a [`HookApi`] that performs the OS calls, and
//! - a [`HookVariant`] strategy that turns the raw event triplet into a typed
//!   notification (keyboard, mouse, or nothing for the generic variant).
//!
//! # Lifecycle
//!
//! ```text
//!   ┌──────────────┐  install() ok   ┌────────────┐
//!   │ uninstalled  │ ──────────────▶ │ installed  │
//!   │ handle=NULL  │ ◀────────────── │ handle≠NULL│
//!   └──────────────┘  uninstall()    └────────────┘
//!          ▲          install() again        │
//!          └───── AlreadyInstalled ──────────┘
//! ```
//!
//! Dropping an installed controller uninstalls it.
//!
//! # Threading
//!
//! Low-level hooks are called on the thread that installed them, so a
//! controller is deliberately `!Send`: it lives and dies on its hook thread,
//! and its policy flags need no synchronization.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use llhook_core::{
    ChainAction, HookKind, LResult, PolicyFlags, RawEventRecord, HALT_RESULT, SWALLOW_RESULT,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::application::hook_api::{HookApi, HookError, HookHandle};
use crate::application::relay::{self, Relay, MAX_HOOK_SLOTS};
use crate::application::subscribers::{HandlerResult, Subscribers};

// ── Policy ────────────────────────────────────────────────────────────────────

/// The two consumer-controlled policy flags of a controller.
///
/// Flags persist across events until changed.  The relay reads them exactly
/// once per event, after every subscriber has returned.
#[derive(Debug, Default)]
pub struct Policy {
    suppress_event: Cell<bool>,
    break_chain: Cell<bool>,
}

impl Policy {
    pub fn suppress_event(&self) -> bool {
        self.suppress_event.get()
    }

    /// Keep events away from every application.
    pub fn set_suppress_event(&self, value: bool) {
        self.suppress_event.set(value);
    }

    pub fn break_chain(&self) -> bool {
        self.break_chain.get()
    }

    /// Stop hooks installed before this one from seeing events.
    pub fn set_break_chain(&self, value: bool) {
        self.break_chain.set(value);
    }

    pub fn flags(&self) -> PolicyFlags {
        PolicyFlags {
            suppress_event: self.suppress_event.get(),
            break_chain: self.break_chain.get(),
        }
    }

    pub fn set_flags(&self, flags: PolicyFlags) {
        self.suppress_event.set(flags.suppress_event);
        self.break_chain.set(flags.break_chain);
    }
}

// ── Variant strategy ──────────────────────────────────────────────────────────

/// Variant-specific half of a hook: which chain it joins and how it
/// publishes typed events.
pub trait HookVariant: 'static {
    /// Chain this variant installs into.  Must not change over time.
    fn kind(&self) -> HookKind;

    /// Publishes the kind-specific notification for one actionable event.
    ///
    /// # Safety
    ///
    /// `raw.lparam` must be null or point to the native record the OS
    /// delivers for [`kind`](Self::kind), valid for the duration of the call.
    unsafe fn notify(&self, raw: &RawEventRecord, policy: &Policy) -> HandlerResult;

    /// Called after a successful install.
    fn on_installed(&self, _handle: HookHandle) {}

    /// Called after every uninstall, successful or not.
    fn on_uninstalled(&self) {}
}

// ── Relay faults ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum RelayFault {
    #[error("subscriber returned an error: {0:#}")]
    Subscriber(anyhow::Error),
    #[error("subscriber panicked")]
    Panicked,
    #[error("relay re-entered while notifying")]
    Reentered,
}

// ── Shared state ──────────────────────────────────────────────────────────────

/// State shared between the controller and its trampoline slot.
struct HookShared<V, A> {
    api: A,
    variant: V,
    handle: Cell<HookHandle>,
    slot: Cell<Option<usize>>,
    policy: Policy,
    processing: Subscribers<RawEventRecord>,
    notifying: Cell<bool>,
}

impl<V: HookVariant, A: HookApi> HookShared<V, A> {
    fn publish(&self, raw: &RawEventRecord) -> Result<(), RelayFault> {
        if self.notifying.replace(true) {
            return Err(RelayFault::Reentered);
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> HandlerResult {
            self.processing.notify(raw, &self.policy)?;
            // SAFETY: `raw` comes from the OS callback for this variant's chain
            // (see the contract on `relay::dispatch`).
            unsafe { self.variant.notify(raw, &self.policy) }
        }));
        self.notifying.set(false);

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(RelayFault::Subscriber(e)),
            Err(_) => Err(RelayFault::Panicked),
        }
    }
}

impl<V: HookVariant, A: HookApi> Relay for HookShared<V, A> {
    fn relay(&self, raw: RawEventRecord) -> LResult {
        if !raw.is_actionable() {
            return self
                .api
                .call_next(self.handle.get(), raw.code, raw.wparam, raw.lparam);
        }

        let action = match self.publish(&raw) {
            Ok(()) => ChainAction::for_flags(self.policy.flags()),
            Err(fault) => {
                warn!(kind = ?self.variant.kind(), "{fault}; passing event through");
                ChainAction::Forward
            }
        };
        trace!(
            kind = ?self.variant.kind(),
            wparam = raw.wparam,
            ?action,
            forwards = action.forwards(),
            "relay decision"
        );

        match action {
            ChainAction::Forward => {
                self.api
                    .call_next(self.handle.get(), raw.code, raw.wparam, raw.lparam)
            }
            ChainAction::InformAndSwallow => {
                self.api
                    .call_next(HookHandle::NULL, raw.code, raw.wparam, raw.lparam);
                SWALLOW_RESULT
            }
            ChainAction::Swallow => SWALLOW_RESULT,
            ChainAction::Halt => HALT_RESULT,
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Owns one OS hook of the variant's kind.
///
/// Several controllers of the same kind may be installed at once; each gets
/// its own handle and its own position in the chain.
pub struct HookController<V: HookVariant, A: HookApi + 'static> {
    shared: Rc<HookShared<V, A>>,
}

impl<V: HookVariant, A: HookApi + 'static> HookController<V, A> {
    /// Creates an uninstalled controller.
    pub fn with_api(variant: V, api: A) -> Self {
        Self {
            shared: Rc::new(HookShared {
                api,
                variant,
                handle: Cell::new(HookHandle::NULL),
                slot: Cell::new(None),
                policy: Policy::default(),
                processing: Subscribers::new(),
                notifying: Cell::new(false),
            }),
        }
    }

    pub fn kind(&self) -> HookKind {
        self.shared.variant.kind()
    }

    /// Current OS handle; [`HookHandle::NULL`] when not installed.
    pub fn handle(&self) -> HookHandle {
        self.shared.handle.get()
    }

    pub fn is_installed(&self) -> bool {
        !self.handle().is_null()
    }

    /// Trampoline slot held while installed.
    pub fn slot(&self) -> Option<usize> {
        self.shared.slot.get()
    }

    pub fn policy(&self) -> &Policy {
        &self.shared.policy
    }

    pub fn set_suppress_event(&self, value: bool) {
        self.shared.policy.set_suppress_event(value);
    }

    pub fn suppress_event(&self) -> bool {
        self.shared.policy.suppress_event()
    }

    pub fn set_break_chain(&self, value: bool) {
        self.shared.policy.set_break_chain(value);
    }

    pub fn break_chain(&self) -> bool {
        self.shared.policy.break_chain()
    }

    pub fn variant(&self) -> &V {
        &self.shared.variant
    }

    pub fn api(&self) -> &A {
        &self.shared.api
    }

    /// Subscribes to the generic notification published for every
    /// actionable event, before the typed one.
    pub fn on_processing<F>(&self, handler: F)
    where
        F: FnMut(&RawEventRecord, &Policy) -> HandlerResult + 'static,
    {
        self.shared.processing.subscribe(handler);
    }

    /// Installs the hook system-wide for the calling desktop.
    ///
    /// The hook is delivered on the calling thread, which must pump messages.
    ///
    /// # Errors
    ///
    /// - [`HookError::AlreadyInstalled`] if a hook is already held; the
    ///   existing hook is uninstalled before this is returned.
    /// - [`HookError::BaseAddressUnavailable`] if the process base module
    ///   cannot be resolved.
    /// - [`HookError::NoFreeSlot`] if the thread has no free trampoline slot.
    /// - [`HookError::InstallFailed`] if the OS refuses the registration.
    pub fn install(&self) -> Result<(), HookError> {
        let kind = self.kind();
        if self.is_installed() {
            warn!(?kind, handle = self.handle().0, "install called twice; uninstalling");
            self.uninstall();
            return Err(HookError::AlreadyInstalled);
        }

        let module = self.shared.api.module_base()?;
        if !kind.is_low_level() {
            warn!(
                ?kind,
                "global hook of a non-low-level kind needs its procedure in a DLL"
            );
        }

        let relay: Rc<dyn Relay> = Rc::clone(&self.shared) as Rc<dyn Relay>;
        let slot = relay::claim_slot(relay).ok_or(HookError::NoFreeSlot(MAX_HOOK_SLOTS))?;

        let handle = match self.shared.api.set_hook(kind, slot, module, 0) {
            Ok(handle) if !handle.is_null() => handle,
            Ok(_) => {
                relay::release_slot(slot);
                warn!(?kind, "OS returned a null hook handle");
                return Err(HookError::InstallFailed { kind, code: 0 });
            }
            Err(code) => {
                relay::release_slot(slot);
                warn!(?kind, code, "hook installation failed");
                return Err(HookError::InstallFailed { kind, code });
            }
        };

        self.shared.handle.set(handle);
        self.shared.slot.set(Some(slot));
        info!(?kind, handle = handle.0, slot, "hook installed");
        self.shared.variant.on_installed(handle);
        Ok(())
    }

    /// Removes the hook and clears the stored handle.
    ///
    /// Safe to call at any time and any number of times.  Returns whether the
    /// OS reported success; calling it while uninstalled returns `false`.
    pub fn uninstall(&self) -> bool {
        let handle = self.shared.handle.replace(HookHandle::NULL);
        let removed = self.shared.api.unhook(handle);
        if let Some(slot) = self.shared.slot.take() {
            relay::release_slot(slot);
        }

        if removed {
            info!(kind = ?self.kind(), handle = handle.0, "hook uninstalled");
        } else if !handle.is_null() {
            warn!(kind = ?self.kind(), handle = handle.0, "OS failed to remove hook");
        } else {
            debug!(kind = ?self.kind(), "uninstall called while not installed");
        }
        self.shared.variant.on_uninstalled();
        removed
    }
}

impl<V: HookVariant, A: HookApi + 'static> Drop for HookController<V, A> {
    fn drop(&mut self) {
        if self.is_installed() {
            self.uninstall();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
