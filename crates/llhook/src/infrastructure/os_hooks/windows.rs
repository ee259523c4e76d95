//! Win32 implementation of the hook primitives.
//!
//! - [`Win32HookApi`] wraps `SetWindowsHookExW`, `CallNextHookEx` and
//!   `UnhookWindowsHookEx`, and resolves the process base module once.
//! - `TRAMPOLINES` holds one `extern "system"` hook procedure per relay slot;
//!   each forwards its arguments to [`relay::dispatch`] with its own index.
//! - [`run_message_loop`] / [`post_quit`] drive the thread the hooks live on.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::ffi::c_void;
use std::sync::OnceLock;

use llhook_core::{HookKind, LParam, LResult, WParam};
use thiserror::Error;
use tracing::{debug, error};
use windows::Win32::Foundation::{GetLastError, HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HHOOK, MSG, WINDOWS_HOOK_ID, WM_QUIT,
};

use crate::application::hook_api::{HookApi, HookError, HookHandle, ModuleBase};
use crate::application::relay::{self, MAX_HOOK_SLOTS};

/// `ERROR_INVALID_PARAMETER`, reported for an out-of-range slot.
const ERROR_INVALID_PARAMETER: u32 = 87;

/// Process base module, resolved on first use and never invalidated.
static MODULE_BASE: OnceLock<Result<isize, u32>> = OnceLock::new();

type HookProc = unsafe extern "system" fn(i32, WPARAM, LPARAM) -> LRESULT;

/// One trampoline per relay slot.
const TRAMPOLINES: [HookProc; MAX_HOOK_SLOTS] = [
    trampoline::<0>,
    trampoline::<1>,
    trampoline::<2>,
    trampoline::<3>,
    trampoline::<4>,
    trampoline::<5>,
    trampoline::<6>,
    trampoline::<7>,
    trampoline::<8>,
    trampoline::<9>,
    trampoline::<10>,
    trampoline::<11>,
    trampoline::<12>,
    trampoline::<13>,
    trampoline::<14>,
    trampoline::<15>,
];

/// Hook procedure registered for slot `SLOT`.
///
/// # Safety
///
/// Called by Windows on the installing thread with the arguments of the
/// chain the slot's hook was registered in.  Must return quickly.
unsafe extern "system" fn trampoline<const SLOT: usize>(
    code: i32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // SAFETY: the arguments are passed through unchanged from the OS, which
    // is exactly the contract `dispatch` requires.
    match relay::dispatch(SLOT, code, wparam.0, lparam.0) {
        Some(result) => LRESULT(result),
        // SAFETY: forwarding with a null anchor is always valid.
        None => CallNextHookEx(None, code, wparam, lparam),
    }
}

fn to_hhook(handle: HookHandle) -> Option<HHOOK> {
    (!handle.is_null()).then(|| HHOOK(handle.0 as *mut c_void))
}

/// The Win32 hook primitives.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32HookApi;

impl Win32HookApi {
    pub fn new() -> Self {
        Self
    }
}

impl HookApi for Win32HookApi {
    fn module_base(&self) -> Result<ModuleBase, HookError> {
        let base = MODULE_BASE.get_or_init(|| {
            // SAFETY: a null module name asks for the calling process's own module.
            match unsafe { GetModuleHandleW(None) } {
                Ok(module) => Ok(module.0 as isize),
                // SAFETY: reads the calling thread's last-error value.
                Err(_) => Err(unsafe { GetLastError() }.0),
            }
        });
        match *base {
            Ok(base) => Ok(ModuleBase(base)),
            Err(code) => {
                error!(code, "process base module is unavailable");
                Err(HookError::BaseAddressUnavailable(code))
            }
        }
    }

    fn set_hook(
        &self,
        kind: HookKind,
        slot: usize,
        module: ModuleBase,
        thread_id: u32,
    ) -> Result<HookHandle, u32> {
        let proc = TRAMPOLINES
            .get(slot)
            .copied()
            .ok_or(ERROR_INVALID_PARAMETER)?;
        // SAFETY: `proc` is a valid hook procedure for the lifetime of the
        // process and `module` is this process's own base module.
        let result = unsafe {
            SetWindowsHookExW(
                WINDOWS_HOOK_ID(kind.id()),
                Some(proc),
                Some(HINSTANCE(module.0 as *mut c_void)),
                thread_id,
            )
        };
        match result {
            Ok(hook) => {
                debug!(?kind, slot, "SetWindowsHookExW succeeded");
                Ok(HookHandle(hook.0 as isize))
            }
            // SAFETY: reads the calling thread's last-error value.
            Err(_) => Err(unsafe { GetLastError() }.0),
        }
    }

    fn call_next(&self, handle: HookHandle, code: i32, wparam: WParam, lparam: LParam) -> LResult {
        // SAFETY: the arguments are the ones the OS handed to the current
        // hook procedure; the handle is ours or null.
        unsafe { CallNextHookEx(to_hhook(handle), code, WPARAM(wparam), LPARAM(lparam)) }.0
    }

    fn unhook(&self, handle: HookHandle) -> bool {
        match to_hhook(handle) {
            // SAFETY: `hook` was returned by SetWindowsHookExW.
            Some(hook) => unsafe { UnhookWindowsHookEx(hook) }.is_ok(),
            None => false,
        }
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

/// Error type for the hook thread's message loop.
#[derive(Debug, Error)]
pub enum MessageLoopError {
    #[error("GetMessageW failed (os error {0})")]
    GetMessage(u32),
    #[error("failed to post WM_QUIT to thread {thread_id} (os error {code})")]
    PostQuit { thread_id: u32, code: u32 },
}

/// Identifier of the calling thread, for [`post_quit`].
pub fn current_thread_id() -> u32 {
    // SAFETY: no preconditions.
    unsafe { GetCurrentThreadId() }
}

/// Pumps messages on the calling thread until `WM_QUIT` arrives.
///
/// Low-level hooks installed on this thread are delivered from inside this
/// loop.
///
/// # Errors
///
/// Returns [`MessageLoopError::GetMessage`] if `GetMessageW` fails.
pub fn run_message_loop() -> Result<(), MessageLoopError> {
    let mut msg = MSG::default();
    loop {
        // SAFETY: standard Win32 GetMessage/DispatchMessage loop pattern.
        let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match status.0 {
            0 => return Ok(()),
            // SAFETY: reads the calling thread's last-error value.
            -1 => return Err(MessageLoopError::GetMessage(unsafe { GetLastError() }.0)),
            _ => {
                // SAFETY: `msg` was filled in by GetMessageW.
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        }
    }
}

/// Asks the message loop on `thread_id` to exit.
///
/// # Errors
///
/// Returns [`MessageLoopError::PostQuit`] if the message cannot be posted.
pub fn post_quit(thread_id: u32) -> Result<(), MessageLoopError> {
    // SAFETY: posting WM_QUIT carries no pointers.
    unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }.map_err(|_| {
        MessageLoopError::PostQuit {
            thread_id,
            // SAFETY: reads the calling thread's last-error value.
            code: unsafe { GetLastError() }.0,
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
