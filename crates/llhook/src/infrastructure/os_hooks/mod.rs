//! Implementations of [`HookApi`](crate::application::hook_api::HookApi).
//!
//! | Module    | Target  | Purpose                                          |
//! |-----------|---------|--------------------------------------------------|
//! | `windows` | Windows | `SetWindowsHookExW` / `CallNextHookEx` / `UnhookWindowsHookEx` plus the trampoline table and message loop |
//! | `mock`    | all     | Records every call so tests can assert on the exact forwarding target |
//!
//! The mock is always compiled so integration tests in `tests/` can drive
//! the full relay on any platform.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::Win32HookApi as NativeHookApi;
