//! The OS primitive seam.
//!
//! [`HookApi`] is the whole surface the lifecycle controller and the relay
//! need from the OS: resolve the process base module, register a hook,
//! forward along the chain, and unregister.  The Win32 implementation lives in
//! `infrastructure::os_hooks::windows`; tests use
//! `infrastructure::os_hooks::mock::RecordingHookApi` or a `mockall` mock.

use std::rc::Rc;

use llhook_core::{HookKind, LParam, LResult, WParam};
use thiserror::Error;

/// OS-assigned identity of an installed hook (`HHOOK`).
///
/// [`HookHandle::NULL`] means "not installed" and doubles as the zero anchor
/// for chain forwarding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HookHandle(pub isize);

impl HookHandle {
    pub const NULL: HookHandle = HookHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Base address of the process's own module (`HMODULE` of the executable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleBase(pub isize);

/// Errors raised by the hook lifecycle.
///
/// Uninstall failures are not errors: `uninstall()` reports them as a `bool`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The process base module could not be resolved.  Fatal for the hook
    /// subsystem: without it no hook can ever be installed.
    #[error("process base module address is unavailable (os error {0})")]
    BaseAddressUnavailable(u32),

    /// The OS registration primitive returned a null handle.
    #[error("failed to install {kind:?} hook (os error {code})")]
    InstallFailed { kind: HookKind, code: u32 },

    /// `install()` was called on an installed controller.  The controller has
    /// already uninstalled itself by the time this is returned.
    #[error("hook was already installed; it has been uninstalled")]
    AlreadyInstalled,

    /// Every trampoline slot on the calling thread is taken.
    #[error("no free hook slot on this thread (limit {0})")]
    NoFreeSlot(usize),
}

/// OS hook primitives.
///
/// `slot` selects which process-wide trampoline is registered; see
/// [`crate::application::relay`].
#[cfg_attr(test, mockall::automock)]
pub trait HookApi {
    /// Returns the process base module, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::BaseAddressUnavailable`] when the OS cannot report it.
    fn module_base(&self) -> Result<ModuleBase, HookError>;

    /// Registers the trampoline for `slot` in the `kind` chain.
    ///
    /// `thread_id == 0` installs system-wide for the calling desktop.
    ///
    /// # Errors
    ///
    /// Returns the OS last-error code when registration fails.
    fn set_hook(
        &self,
        kind: HookKind,
        slot: usize,
        module: ModuleBase,
        thread_id: u32,
    ) -> Result<HookHandle, u32>;

    /// Passes the event to the next hook.  `handle` may be [`HookHandle::NULL`].
    fn call_next(&self, handle: HookHandle, code: i32, wparam: WParam, lparam: LParam)
        -> LResult;

    /// Removes a hook.  Returns `false` on failure, including for the null handle.
    fn unhook(&self, handle: HookHandle) -> bool;
}

impl<A: HookApi + ?Sized> HookApi for Rc<A> {
    fn module_base(&self) -> Result<ModuleBase, HookError> {
        (**self).module_base()
    }

    fn set_hook(
        &self,
        kind: HookKind,
        slot: usize,
        module: ModuleBase,
        thread_id: u32,
    ) -> Result<HookHandle, u32> {
        (**self).set_hook(kind, slot, module, thread_id)
    }

    fn call_next(
        &self,
        handle: HookHandle,
        code: i32,
        wparam: WParam,
        lparam: LParam,
    ) -> LResult {
        (**self).call_next(handle, code, wparam, lparam)
    }

    fn unhook(&self, handle: HookHandle) -> bool {
        (**self).unhook(handle)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
