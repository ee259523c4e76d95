//! Infrastructure layer.
//!
//! Contains OS-facing adapters: the Win32 hook primitives, the window-query
//! collaborator, and file-system configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `llhook_core`, but MUST NOT be imported by the `application` layer.

pub mod os_hooks;
pub mod storage;
pub mod window;
