//! Recording hook API for tests.
//!
//! [`RecordingHookApi`] behaves like a well-mannered OS: it hands out
//! increasing non-null handles, remembers which are live, and records every
//! forwarding call with its exact arguments.  Failures are scripted through
//! the setter methods.
//!
//! ```ignore
//! let api = Rc::new(RecordingHookApi::new());
//! let hook = KeyboardHook::keyboard(Rc::clone(&api));
//! hook.install()?;
//! // ... dispatch a synthesized event ...
//! assert_eq!(api.forwards()[0].handle, hook.handle());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use llhook_core::{HookKind, LParam, LResult, WParam};

use crate::application::hook_api::{HookApi, HookError, HookHandle, ModuleBase};

/// Module base reported by the mock.
pub const MOCK_MODULE_BASE: ModuleBase = ModuleBase(0x0040_0000);

/// One recorded `set_hook` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallCall {
    pub kind: HookKind,
    pub slot: usize,
    pub module: ModuleBase,
    pub thread_id: u32,
}

/// One recorded `call_next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardCall {
    pub handle: HookHandle,
    pub code: i32,
    pub wparam: WParam,
    pub lparam: LParam,
}

/// A [`HookApi`] that records calls instead of touching the OS.
#[derive(Debug)]
pub struct RecordingHookApi {
    next_handle: Cell<isize>,
    live: RefCell<HashSet<HookHandle>>,
    installs: RefCell<Vec<InstallCall>>,
    forwards: RefCell<Vec<ForwardCall>>,
    unhooks: RefCell<Vec<HookHandle>>,
    next_result: Cell<LResult>,
    install_error: Cell<Option<u32>>,
    base_error: Cell<Option<u32>>,
}

impl RecordingHookApi {
    pub fn new() -> Self {
        Self {
            next_handle: Cell::new(0x1000),
            live: RefCell::new(HashSet::new()),
            installs: RefCell::new(Vec::new()),
            forwards: RefCell::new(Vec::new()),
            unhooks: RefCell::new(Vec::new()),
            next_result: Cell::new(0),
            install_error: Cell::new(None),
            base_error: Cell::new(None),
        }
    }

    /// Value `call_next` returns, standing in for the rest of the chain.
    pub fn set_next_result(&self, result: LResult) {
        self.next_result.set(result);
    }

    /// Makes every following `set_hook` fail with `code`; `None` restores success.
    pub fn fail_installs_with(&self, code: Option<u32>) {
        self.install_error.set(code);
    }

    /// Makes `module_base` fail with `code`.
    pub fn fail_module_base_with(&self, code: Option<u32>) {
        self.base_error.set(code);
    }

    pub fn installs(&self) -> Vec<InstallCall> {
        self.installs.borrow().clone()
    }

    pub fn forwards(&self) -> Vec<ForwardCall> {
        self.forwards.borrow().clone()
    }

    pub fn unhooks(&self) -> Vec<HookHandle> {
        self.unhooks.borrow().clone()
    }

    /// Number of hooks currently registered.
    pub fn live_hooks(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn clear_forwards(&self) {
        self.forwards.borrow_mut().clear();
    }
}

impl Default for RecordingHookApi {
    fn default() -> Self {
        Self::new()
    }
}

impl HookApi for RecordingHookApi {
    fn module_base(&self) -> Result<ModuleBase, HookError> {
        match self.base_error.get() {
            Some(code) => Err(HookError::BaseAddressUnavailable(code)),
            None => Ok(MOCK_MODULE_BASE),
        }
    }

    fn set_hook(
        &self,
        kind: HookKind,
        slot: usize,
        module: ModuleBase,
        thread_id: u32,
    ) -> Result<HookHandle, u32> {
        self.installs.borrow_mut().push(InstallCall {
            kind,
            slot,
            module,
            thread_id,
        });
        if let Some(code) = self.install_error.get() {
            return Err(code);
        }
        let handle = HookHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 0x10);
        self.live.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn call_next(&self, handle: HookHandle, code: i32, wparam: WParam, lparam: LParam) -> LResult {
        self.forwards.borrow_mut().push(ForwardCall {
            handle,
            code,
            wparam,
            lparam,
        });
        self.next_result.get()
    }

    fn unhook(&self, handle: HookHandle) -> bool {
        self.unhooks.borrow_mut().push(handle);
        self.live.borrow_mut().remove(&handle)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
